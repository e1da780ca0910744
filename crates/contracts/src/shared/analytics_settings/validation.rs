//! Numeric validation rules for settings parameters

/// Range constraint for a single numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberRule {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// When set, `min` itself is not an accepted value
    pub min_exclusive: bool,
}

impl NumberRule {
    /// Inclusive range `min..=max`
    pub const fn range(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            min_exclusive: false,
        }
    }

    /// Inclusive lower bound only
    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
            min_exclusive: false,
        }
    }

    /// Exclusive lower bound only
    pub const fn greater_than(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
            min_exclusive: true,
        }
    }

    /// Validate a numeric value against the rule.
    ///
    /// Non-finite values never pass, whatever the bounds are.
    pub fn check(&self, value: f64, field_label: &str) -> Result<(), String> {
        if !value.is_finite() {
            return Err(format!("{} must be a finite number", field_label));
        }

        let below_min = match self.min {
            Some(min) if self.min_exclusive => value <= min,
            Some(min) => value < min,
            None => false,
        };
        let above_max = matches!(self.max, Some(max) if value > max);

        if !(below_min || above_max) {
            return Ok(());
        }

        Err(match (self.min, self.max) {
            (Some(min), Some(max)) => format!(
                "{} must be between {} and {} (got {})",
                field_label, min, max, value
            ),
            (Some(min), None) if self.min_exclusive => {
                format!("{} must be greater than {} (got {})", field_label, min, value)
            }
            (Some(min), None) => {
                format!("{} must be at least {} (got {})", field_label, min, value)
            }
            (None, Some(max)) => {
                format!("{} must be at most {} (got {})", field_label, max, value)
            }
            (None, None) => unreachable!("a rule without bounds never fails on finite input"),
        })
    }
}

/// Accumulates violation messages in the order checks are made.
///
/// Checks never short-circuit: every failing rule adds its own message.
#[derive(Debug, Default)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a per-field check. The label is rendered as `"<category>: <parameter>"`.
    pub fn check(&mut self, rule: NumberRule, value: f64, category: &str, parameter: &str) {
        let label = format!("{}: {}", category, parameter);
        if let Err(message) = rule.check(value, &label) {
            self.messages.push(message);
        }
    }

    /// Integer flavour of [`Violations::check`].
    pub fn check_count(&mut self, rule: NumberRule, value: u32, category: &str, parameter: &str) {
        self.check(rule, f64::from(value), category, parameter);
    }

    /// Record a cross-field constraint. `message` is pushed when `holds` is false.
    pub fn require(&mut self, holds: bool, category: &str, message: &str) {
        if !holds {
            self.messages.push(format!("{}: {}", category, message));
        }
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_are_inclusive() {
        let rule = NumberRule::range(1.0, 100.0);
        assert!(rule.check(1.0, "limit").is_ok());
        assert!(rule.check(100.0, "limit").is_ok());
        assert_eq!(
            rule.check(0.0, "limit"),
            Err("limit must be between 1 and 100 (got 0)".to_string())
        );
        assert_eq!(
            rule.check(101.0, "limit"),
            Err("limit must be between 1 and 100 (got 101)".to_string())
        );
    }

    #[test]
    fn test_exclusive_lower_bound() {
        let rule = NumberRule::greater_than(0.0);
        assert!(rule.check(0.001, "normalizer").is_ok());
        assert_eq!(
            rule.check(0.0, "normalizer"),
            Err("normalizer must be greater than 0 (got 0)".to_string())
        );
    }

    #[test]
    fn test_non_finite_values_fail() {
        let rule = NumberRule::at_least(0.0);
        assert_eq!(
            rule.check(f64::NAN, "min sales"),
            Err("min sales must be a finite number".to_string())
        );
        assert!(rule.check(f64::INFINITY, "min sales").is_err());
        assert!(NumberRule::default().check(f64::NEG_INFINITY, "x").is_err());
    }

    #[test]
    fn test_violations_accumulate_in_order() {
        let mut v = Violations::new();
        v.check_count(NumberRule::range(1.0, 10.0), 0, "A", "first");
        v.check(NumberRule::at_least(0.0), 5.0, "A", "ok");
        v.check(NumberRule::at_least(0.0), -1.5, "B", "second");
        v.require(false, "B", "cross-field");
        assert_eq!(
            v.into_messages(),
            vec![
                "A: first must be between 1 and 10 (got 0)".to_string(),
                "B: second must be at least 0 (got -1.5)".to_string(),
                "B: cross-field".to_string(),
            ]
        );
    }
}
