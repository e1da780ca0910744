//! Segment classification thresholds
//!
//! Tier ladders used to label accounts returned by the analytics API:
//! performance tiers, activity levels, value levels and converter segments.

use serde::{Deserialize, Serialize};

use super::domain::{merge_category, settings_category, SettingsDomain};
use super::validation::{NumberRule, Violations};

const NON_NEGATIVE: NumberRule = NumberRule::at_least(0.0);
const COUNT: NumberRule = NumberRule::range(1.0, 10_000.0);
const EFFICIENCY: NumberRule = NumberRule::range(0.0, 10.0);

settings_category! {
    /// Minimum engagement score and sales per tier
    pub struct PerformanceTiers / PerformanceTiersPatch {
        platinum_engagement: f64,
        platinum_sales: f64,
        gold_engagement: f64,
        gold_sales: f64,
        silver_engagement: f64,
        silver_sales: f64,
        bronze_engagement: f64,
        bronze_sales: f64,
    }
}

settings_category! {
    /// Minimum program and task counts per activity level
    pub struct ActivityLevels / ActivityLevelsPatch {
        highly_active_programs: u32,
        highly_active_tasks: u32,
        active_programs: u32,
        active_tasks: u32,
        moderate_programs: u32,
        moderate_tasks: u32,
        low_programs: u32,
    }
}

settings_category! {
    pub struct ValueLevels / ValueLevelsPatch {
        high_value_sales: f64,
        medium_value_sales: f64,
    }
}

settings_category! {
    /// Minimum sales per engagement point per converter segment
    pub struct ConversionEfficiency / ConversionEfficiencyPatch {
        super_converter: f64,
        high_converter: f64,
        average_converter: f64,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSettings {
    pub performance_tiers: PerformanceTiers,
    pub activity_levels: ActivityLevels,
    pub value_levels: ValueLevels,
    pub conversion_efficiency: ConversionEfficiency,
}

impl Default for SegmentSettings {
    fn default() -> Self {
        Self {
            performance_tiers: PerformanceTiers {
                platinum_engagement: 50_000.0,
                platinum_sales: 5_000.0,
                gold_engagement: 20_000.0,
                gold_sales: 2_000.0,
                silver_engagement: 5_000.0,
                silver_sales: 500.0,
                bronze_engagement: 1_000.0,
                bronze_sales: 100.0,
            },
            activity_levels: ActivityLevels {
                highly_active_programs: 10,
                highly_active_tasks: 10,
                active_programs: 5,
                active_tasks: 5,
                moderate_programs: 2,
                moderate_tasks: 2,
                low_programs: 1,
            },
            value_levels: ValueLevels {
                high_value_sales: 2_000.0,
                medium_value_sales: 500.0,
            },
            conversion_efficiency: ConversionEfficiency {
                super_converter: 0.5,
                high_converter: 0.3,
                average_converter: 0.1,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSettingsPartial {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub performance_tiers: Option<PerformanceTiersPatch>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub activity_levels: Option<ActivityLevelsPatch>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub value_levels: Option<ValueLevelsPatch>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub conversion_efficiency: Option<ConversionEfficiencyPatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "fields", rename_all = "camelCase")]
pub enum SegmentPatch {
    PerformanceTiers(PerformanceTiersPatch),
    ActivityLevels(ActivityLevelsPatch),
    ValueLevels(ValueLevelsPatch),
    ConversionEfficiency(ConversionEfficiencyPatch),
}

impl SegmentPatch {
    pub fn category(&self) -> &'static str {
        match self {
            SegmentPatch::PerformanceTiers(_) => "performanceTiers",
            SegmentPatch::ActivityLevels(_) => "activityLevels",
            SegmentPatch::ValueLevels(_) => "valueLevels",
            SegmentPatch::ConversionEfficiency(_) => "conversionEfficiency",
        }
    }
}

pub struct SegmentDomain;

impl SettingsDomain for SegmentDomain {
    const STORAGE_KEY: &'static str = "segment-settings";
    const TITLE: &'static str = "segment classification";

    type Config = SegmentSettings;
    type Partial = SegmentSettingsPartial;
    type Patch = SegmentPatch;

    fn defaults() -> SegmentSettings {
        SegmentSettings::default()
    }

    fn merge(partial: Option<&SegmentSettingsPartial>, defaults: &SegmentSettings) -> SegmentSettings {
        let Some(partial) = partial else {
            return *defaults;
        };
        SegmentSettings {
            performance_tiers: merge_category(
                &defaults.performance_tiers,
                partial.performance_tiers.as_ref(),
            ),
            activity_levels: merge_category(&defaults.activity_levels, partial.activity_levels.as_ref()),
            value_levels: merge_category(&defaults.value_levels, partial.value_levels.as_ref()),
            conversion_efficiency: merge_category(
                &defaults.conversion_efficiency,
                partial.conversion_efficiency.as_ref(),
            ),
        }
    }

    fn apply(current: &SegmentSettings, patch: &SegmentPatch) -> SegmentSettings {
        let mut partial = SegmentSettingsPartial::default();
        match patch {
            SegmentPatch::PerformanceTiers(p) => partial.performance_tiers = Some(*p),
            SegmentPatch::ActivityLevels(p) => partial.activity_levels = Some(*p),
            SegmentPatch::ValueLevels(p) => partial.value_levels = Some(*p),
            SegmentPatch::ConversionEfficiency(p) => partial.conversion_efficiency = Some(*p),
        }
        Self::merge(Some(&partial), current)
    }

    fn validate(config: &SegmentSettings) -> Vec<String> {
        let mut v = Violations::new();

        let tiers = &config.performance_tiers;
        for (label, value) in [
            ("platinum engagement", tiers.platinum_engagement),
            ("platinum sales", tiers.platinum_sales),
            ("gold engagement", tiers.gold_engagement),
            ("gold sales", tiers.gold_sales),
            ("silver engagement", tiers.silver_engagement),
            ("silver sales", tiers.silver_sales),
            ("bronze engagement", tiers.bronze_engagement),
            ("bronze sales", tiers.bronze_sales),
        ] {
            v.check(NON_NEGATIVE, value, "Performance tiers", label);
        }

        let activity = &config.activity_levels;
        for (label, value) in [
            ("highly active programs", activity.highly_active_programs),
            ("highly active tasks", activity.highly_active_tasks),
            ("active programs", activity.active_programs),
            ("active tasks", activity.active_tasks),
            ("moderate programs", activity.moderate_programs),
            ("moderate tasks", activity.moderate_tasks),
            ("low activity programs", activity.low_programs),
        ] {
            v.check_count(COUNT, value, "Activity levels", label);
        }

        let value_levels = &config.value_levels;
        v.check(NON_NEGATIVE, value_levels.high_value_sales, "Value levels", "high value sales");
        v.check(NON_NEGATIVE, value_levels.medium_value_sales, "Value levels", "medium value sales");

        let conversion = &config.conversion_efficiency;
        v.check(EFFICIENCY, conversion.super_converter, "Conversion efficiency", "super converter");
        v.check(EFFICIENCY, conversion.high_converter, "Conversion efficiency", "high converter");
        v.check(EFFICIENCY, conversion.average_converter, "Conversion efficiency", "average converter");

        v.require(
            is_non_increasing(&[
                tiers.platinum_engagement,
                tiers.gold_engagement,
                tiers.silver_engagement,
                tiers.bronze_engagement,
            ]),
            "Performance tiers",
            "engagement thresholds must not increase from platinum down to bronze",
        );
        v.require(
            is_non_increasing(&[
                tiers.platinum_sales,
                tiers.gold_sales,
                tiers.silver_sales,
                tiers.bronze_sales,
            ]),
            "Performance tiers",
            "sales thresholds must not increase from platinum down to bronze",
        );
        v.require(
            is_non_increasing(&[
                f64::from(activity.highly_active_programs),
                f64::from(activity.active_programs),
                f64::from(activity.moderate_programs),
                f64::from(activity.low_programs),
            ]),
            "Activity levels",
            "program thresholds must not increase from highly active down to low activity",
        );
        v.require(
            is_non_increasing(&[
                f64::from(activity.highly_active_tasks),
                f64::from(activity.active_tasks),
                f64::from(activity.moderate_tasks),
            ]),
            "Activity levels",
            "task thresholds must not increase from highly active down to moderate",
        );
        v.require(
            value_levels.high_value_sales > value_levels.medium_value_sales,
            "Value levels",
            "high value sales must be greater than medium value sales",
        );
        v.require(
            is_non_increasing(&[
                conversion.super_converter,
                conversion.high_converter,
                conversion.average_converter,
            ]),
            "Conversion efficiency",
            "thresholds must not increase from super down to average converters",
        );

        v.into_messages()
    }

    fn to_partial(config: &SegmentSettings) -> SegmentSettingsPartial {
        SegmentSettingsPartial {
            performance_tiers: Some((&config.performance_tiers).into()),
            activity_levels: Some((&config.activity_levels).into()),
            value_levels: Some((&config.value_levels).into()),
            conversion_efficiency: Some((&config.conversion_efficiency).into()),
        }
    }
}

fn is_non_increasing(ladder: &[f64]) -> bool {
    ladder.windows(2).all(|pair| pair[0] >= pair[1])
}

// ============================================================================
// Classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    Platinum,
    Gold,
    Silver,
    Bronze,
    Starter,
}

impl PerformanceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceTier::Platinum => "Platinum",
            PerformanceTier::Gold => "Gold",
            PerformanceTier::Silver => "Silver",
            PerformanceTier::Bronze => "Bronze",
            PerformanceTier::Starter => "Starter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    HighlyActive,
    Active,
    ModeratelyActive,
    LowActivity,
    Inactive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::HighlyActive => "Highly Active",
            ActivityLevel::Active => "Active",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::LowActivity => "Low Activity",
            ActivityLevel::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueLevel {
    HighValue,
    MediumValue,
    LowValue,
    NoSales,
}

impl ValueLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueLevel::HighValue => "High Value",
            ValueLevel::MediumValue => "Medium Value",
            ValueLevel::LowValue => "Low Value",
            ValueLevel::NoSales => "No Sales Yet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterSegment {
    Super,
    High,
    Average,
    Low,
}

impl ConverterSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConverterSegment::Super => "Super Converters",
            ConverterSegment::High => "High Converters",
            ConverterSegment::Average => "Average Converters",
            ConverterSegment::Low => "Low Converters",
        }
    }
}

impl SegmentSettings {
    /// Platinum, Gold and Silver need both thresholds, Bronze needs either one.
    pub fn performance_tier(&self, engagement: f64, sales: f64) -> PerformanceTier {
        let t = &self.performance_tiers;
        if engagement >= t.platinum_engagement && sales >= t.platinum_sales {
            PerformanceTier::Platinum
        } else if engagement >= t.gold_engagement && sales >= t.gold_sales {
            PerformanceTier::Gold
        } else if engagement >= t.silver_engagement && sales >= t.silver_sales {
            PerformanceTier::Silver
        } else if engagement >= t.bronze_engagement || sales >= t.bronze_sales {
            PerformanceTier::Bronze
        } else {
            PerformanceTier::Starter
        }
    }

    pub fn activity_level(&self, programs: u32, tasks: u32) -> ActivityLevel {
        let a = &self.activity_levels;
        if programs >= a.highly_active_programs && tasks >= a.highly_active_tasks {
            ActivityLevel::HighlyActive
        } else if programs >= a.active_programs && tasks >= a.active_tasks {
            ActivityLevel::Active
        } else if programs >= a.moderate_programs && tasks >= a.moderate_tasks {
            ActivityLevel::ModeratelyActive
        } else if programs >= a.low_programs {
            ActivityLevel::LowActivity
        } else {
            ActivityLevel::Inactive
        }
    }

    /// Thresholds are exclusive: sales must be strictly above them.
    pub fn value_level(&self, sales: f64) -> ValueLevel {
        let v = &self.value_levels;
        if sales > v.high_value_sales {
            ValueLevel::HighValue
        } else if sales > v.medium_value_sales {
            ValueLevel::MediumValue
        } else if sales > 0.0 {
            ValueLevel::LowValue
        } else {
            ValueLevel::NoSales
        }
    }

    /// `efficiency` is sales per engagement point.
    pub fn converter_segment(&self, efficiency: f64) -> ConverterSegment {
        let c = &self.conversion_efficiency;
        if efficiency >= c.super_converter {
            ConverterSegment::Super
        } else if efficiency >= c.high_converter {
            ConverterSegment::High
        } else if efficiency >= c.average_converter {
            ConverterSegment::Average
        } else {
            ConverterSegment::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::analytics_settings::merge_with_defaults;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SegmentDomain::validate(&SegmentDomain::defaults()).is_empty());
    }

    #[test]
    fn test_performance_tiers_with_defaults() {
        let s = SegmentSettings::default();
        assert_eq!(s.performance_tier(60_000.0, 6_000.0), PerformanceTier::Platinum);
        assert_eq!(s.performance_tier(60_000.0, 2_500.0), PerformanceTier::Gold);
        assert_eq!(s.performance_tier(5_000.0, 500.0), PerformanceTier::Silver);
        assert_eq!(s.performance_tier(0.0, 100.0), PerformanceTier::Bronze);
        assert_eq!(s.performance_tier(999.0, 99.0), PerformanceTier::Starter);
        assert_eq!(PerformanceTier::Starter.as_str(), "Starter");
    }

    #[test]
    fn test_activity_levels_with_defaults() {
        let s = SegmentSettings::default();
        assert_eq!(s.activity_level(10, 10), ActivityLevel::HighlyActive);
        assert_eq!(s.activity_level(12, 9), ActivityLevel::Active);
        assert_eq!(s.activity_level(3, 1), ActivityLevel::LowActivity);
        assert_eq!(s.activity_level(2, 2), ActivityLevel::ModeratelyActive);
        assert_eq!(s.activity_level(0, 50), ActivityLevel::Inactive);
        assert_eq!(ActivityLevel::ModeratelyActive.as_str(), "Moderately Active");
    }

    #[test]
    fn test_value_and_converter_segments() {
        let s = SegmentSettings::default();
        assert_eq!(s.value_level(2_000.0), ValueLevel::MediumValue);
        assert_eq!(s.value_level(2_000.01), ValueLevel::HighValue);
        assert_eq!(s.value_level(500.0), ValueLevel::LowValue);
        assert_eq!(s.value_level(0.0), ValueLevel::NoSales);
        assert_eq!(ValueLevel::NoSales.as_str(), "No Sales Yet");

        assert_eq!(s.converter_segment(0.5), ConverterSegment::Super);
        assert_eq!(s.converter_segment(0.3), ConverterSegment::High);
        assert_eq!(s.converter_segment(0.1), ConverterSegment::Average);
        assert_eq!(s.converter_segment(0.05), ConverterSegment::Low);
    }

    #[test]
    fn test_custom_thresholds_change_classification() {
        let partial: SegmentSettingsPartial =
            serde_json::from_str(r#"{"valueLevels":{"highValueSales":1000}}"#).unwrap();
        let s = merge_with_defaults::<SegmentDomain>(Some(&partial));
        assert_eq!(s.value_level(1_500.0), ValueLevel::HighValue);
        assert_eq!(s.value_levels.medium_value_sales, 500.0);
    }

    #[test]
    fn test_inverted_ladders_are_reported() {
        let mut config = SegmentDomain::defaults();
        config.performance_tiers.gold_sales = 6_000.0;
        config.activity_levels.low_programs = 0;
        config.value_levels.medium_value_sales = 2_000.0;

        assert_eq!(
            SegmentDomain::validate(&config),
            vec![
                "Activity levels: low activity programs must be between 1 and 10000 (got 0)".to_string(),
                "Performance tiers: sales thresholds must not increase from platinum down to bronze"
                    .to_string(),
                "Value levels: high value sales must be greater than medium value sales".to_string(),
            ]
        );
    }

    #[test]
    fn test_apply_conversion_patch() {
        let current = SegmentDomain::defaults();
        let updated = SegmentDomain::apply(
            &current,
            &SegmentPatch::ConversionEfficiency(ConversionEfficiencyPatch {
                super_converter: Some(0.8),
                ..Default::default()
            }),
        );
        assert_eq!(updated.conversion_efficiency.super_converter, 0.8);
        assert_eq!(updated.conversion_efficiency.high_converter, 0.3);
        assert_eq!(updated.performance_tiers, current.performance_tiers);
        assert_eq!(updated.activity_levels, current.activity_levels);
    }
}
