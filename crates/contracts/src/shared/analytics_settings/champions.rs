//! Champion tier thresholds
//!
//! One category per champion ranking of the analytics API plus a `general`
//! category holding the selected ranking and the result limit.

use serde::{Deserialize, Serialize};

use super::domain::{merge_category, settings_category, SettingsDomain};
use super::validation::{NumberRule, Violations};

const LIMIT: NumberRule = NumberRule::range(1.0, 100.0);
const WEIGHT: NumberRule = NumberRule::range(0.0, 1.0);
const NON_NEGATIVE: NumberRule = NumberRule::at_least(0.0);
const NORMALIZER: NumberRule = NumberRule::greater_than(0.0);

/// Which champion ranking the dashboard shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChampionType {
    #[default]
    Overall,
    Sales,
    Engagement,
    Balanced,
}

impl ChampionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChampionType::Overall => "overall",
            ChampionType::Sales => "sales",
            ChampionType::Engagement => "engagement",
            ChampionType::Balanced => "balanced",
        }
    }
}

settings_category! {
    pub struct GeneralChampionSettings / GeneralChampionSettingsPatch {
        champion_type: ChampionType,
        limit: u32,
    }
}

settings_category! {
    /// Weights of the overall champion score
    pub struct OverallWeights / OverallWeightsPatch {
        engagement_weight: f64,
        sales_weight: f64,
        /// Applied to the program conversion rate (scaled by 10 on the server)
        conversion_weight: f64,
    }
}

settings_category! {
    pub struct SalesChampionSettings / SalesChampionSettingsPatch {
        /// Accounts must sell strictly more than this
        min_sales: f64,
    }
}

settings_category! {
    /// Engagement champions and their "potential" flags
    pub struct EngagementChampionSettings / EngagementChampionSettingsPatch {
        min_engagement: f64,
        high_potential_engagement: f64,
        high_potential_sales: f64,
        medium_potential_engagement: f64,
        medium_potential_sales: f64,
    }
}

settings_category! {
    pub struct BalancedChampionSettings / BalancedChampionSettingsPatch {
        min_engagement: f64,
        min_sales: f64,
        engagement_normalizer: f64,
        sales_normalizer: f64,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionSettings {
    pub general: GeneralChampionSettings,
    pub overall: OverallWeights,
    pub sales: SalesChampionSettings,
    pub engagement: EngagementChampionSettings,
    pub balanced: BalancedChampionSettings,
}

impl Default for ChampionSettings {
    fn default() -> Self {
        Self {
            general: GeneralChampionSettings {
                champion_type: ChampionType::Overall,
                limit: 50,
            },
            overall: OverallWeights {
                engagement_weight: 0.4,
                sales_weight: 0.4,
                conversion_weight: 0.2,
            },
            sales: SalesChampionSettings { min_sales: 0.0 },
            engagement: EngagementChampionSettings {
                min_engagement: 300.0,
                high_potential_engagement: 800.0,
                high_potential_sales: 1000.0,
                medium_potential_engagement: 600.0,
                medium_potential_sales: 2000.0,
            },
            balanced: BalancedChampionSettings {
                min_engagement: 500.0,
                min_sales: 500.0,
                engagement_normalizer: 1000.0,
                sales_normalizer: 1000.0,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionSettingsPartial {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub general: Option<GeneralChampionSettingsPatch>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub overall: Option<OverallWeightsPatch>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub sales: Option<SalesChampionSettingsPatch>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub engagement: Option<EngagementChampionSettingsPatch>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub balanced: Option<BalancedChampionSettingsPatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "fields", rename_all = "camelCase")]
pub enum ChampionPatch {
    General(GeneralChampionSettingsPatch),
    Overall(OverallWeightsPatch),
    Sales(SalesChampionSettingsPatch),
    Engagement(EngagementChampionSettingsPatch),
    Balanced(BalancedChampionSettingsPatch),
}

impl ChampionPatch {
    pub fn category(&self) -> &'static str {
        match self {
            ChampionPatch::General(_) => "general",
            ChampionPatch::Overall(_) => "overall",
            ChampionPatch::Sales(_) => "sales",
            ChampionPatch::Engagement(_) => "engagement",
            ChampionPatch::Balanced(_) => "balanced",
        }
    }
}

pub struct ChampionDomain;

impl SettingsDomain for ChampionDomain {
    const STORAGE_KEY: &'static str = "champion-settings";
    const TITLE: &'static str = "champion tiers";

    type Config = ChampionSettings;
    type Partial = ChampionSettingsPartial;
    type Patch = ChampionPatch;

    fn defaults() -> ChampionSettings {
        ChampionSettings::default()
    }

    fn merge(partial: Option<&ChampionSettingsPartial>, defaults: &ChampionSettings) -> ChampionSettings {
        let Some(partial) = partial else {
            return *defaults;
        };
        ChampionSettings {
            general: merge_category(&defaults.general, partial.general.as_ref()),
            overall: merge_category(&defaults.overall, partial.overall.as_ref()),
            sales: merge_category(&defaults.sales, partial.sales.as_ref()),
            engagement: merge_category(&defaults.engagement, partial.engagement.as_ref()),
            balanced: merge_category(&defaults.balanced, partial.balanced.as_ref()),
        }
    }

    fn apply(current: &ChampionSettings, patch: &ChampionPatch) -> ChampionSettings {
        let mut partial = ChampionSettingsPartial::default();
        match patch {
            ChampionPatch::General(p) => partial.general = Some(*p),
            ChampionPatch::Overall(p) => partial.overall = Some(*p),
            ChampionPatch::Sales(p) => partial.sales = Some(*p),
            ChampionPatch::Engagement(p) => partial.engagement = Some(*p),
            ChampionPatch::Balanced(p) => partial.balanced = Some(*p),
        }
        Self::merge(Some(&partial), current)
    }

    fn validate(config: &ChampionSettings) -> Vec<String> {
        let mut v = Violations::new();

        v.check_count(LIMIT, config.general.limit, "Champions", "limit");

        let weights = &config.overall;
        v.check(WEIGHT, weights.engagement_weight, "Overall champions", "engagement weight");
        v.check(WEIGHT, weights.sales_weight, "Overall champions", "sales weight");
        v.check(WEIGHT, weights.conversion_weight, "Overall champions", "conversion weight");

        v.check(NON_NEGATIVE, config.sales.min_sales, "Sales champions", "minimum sales");

        let eng = &config.engagement;
        v.check(NON_NEGATIVE, eng.min_engagement, "Engagement champions", "minimum engagement");
        v.check(
            NON_NEGATIVE,
            eng.high_potential_engagement,
            "Engagement champions",
            "high potential engagement",
        );
        v.check(
            NON_NEGATIVE,
            eng.high_potential_sales,
            "Engagement champions",
            "high potential sales",
        );
        v.check(
            NON_NEGATIVE,
            eng.medium_potential_engagement,
            "Engagement champions",
            "medium potential engagement",
        );
        v.check(
            NON_NEGATIVE,
            eng.medium_potential_sales,
            "Engagement champions",
            "medium potential sales",
        );

        let balanced = &config.balanced;
        v.check(NON_NEGATIVE, balanced.min_engagement, "Balanced champions", "minimum engagement");
        v.check(NON_NEGATIVE, balanced.min_sales, "Balanced champions", "minimum sales");
        v.check(
            NORMALIZER,
            balanced.engagement_normalizer,
            "Balanced champions",
            "engagement normalizer",
        );
        v.check(NORMALIZER, balanced.sales_normalizer, "Balanced champions", "sales normalizer");

        v.require(
            [weights.engagement_weight, weights.sales_weight, weights.conversion_weight]
                .iter()
                .any(|w| *w != 0.0),
            "Overall champions",
            "at least one weight must be non-zero",
        );
        v.require(
            eng.high_potential_engagement >= eng.medium_potential_engagement,
            "Engagement champions",
            "high potential engagement must not be below medium potential engagement",
        );
        v.require(
            eng.high_potential_sales <= eng.medium_potential_sales,
            "Engagement champions",
            "high potential sales must not exceed medium potential sales",
        );

        v.into_messages()
    }

    fn to_partial(config: &ChampionSettings) -> ChampionSettingsPartial {
        ChampionSettingsPartial {
            general: Some((&config.general).into()),
            overall: Some((&config.overall).into()),
            sales: Some((&config.sales).into()),
            engagement: Some((&config.engagement).into()),
            balanced: Some((&config.balanced).into()),
        }
    }
}
