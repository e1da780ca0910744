//! Outlier detection thresholds
//!
//! Parameters of the sales outlier, engagement anomaly and efficient
//! converter queries of the analytics API.

use serde::{Deserialize, Serialize};

use super::domain::{merge_category, settings_category, SettingsDomain};
use super::validation::{NumberRule, Violations};

const LIMIT_100: NumberRule = NumberRule::range(1.0, 100.0);
const LIMIT_200: NumberRule = NumberRule::range(1.0, 200.0);
const Z_SCORE: NumberRule = NumberRule::range(1.0, 5.0);
const NON_NEGATIVE: NumberRule = NumberRule::at_least(0.0);
const EFFICIENCY: NumberRule = NumberRule::range(0.0, 10.0);

settings_category! {
    /// Result limit and z-score cut-off of a statistical outlier query
    pub struct ZScoreFilter / ZScoreFilterPatch {
        /// Maximum rows returned
        limit: u32,
        /// Minimum absolute z-score for a row to be flagged
        min_z_score: f64,
    }
}

settings_category! {
    /// "High sales despite low engagement" pattern
    pub struct EfficientConverters / EfficientConvertersPatch {
        limit: u32,
        /// Sales must exceed this amount (0 disables the cut-off)
        min_sales: f64,
        /// Engagement must stay below this score (0 disables the cut-off)
        max_engagement: f64,
        /// Minimum sales per engagement point
        min_efficiency: f64,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierSettings {
    pub sales_outliers: ZScoreFilter,
    pub engagement_anomalies: ZScoreFilter,
    pub efficient_converters: EfficientConverters,
}

impl Default for OutlierSettings {
    fn default() -> Self {
        Self {
            sales_outliers: ZScoreFilter {
                limit: 50,
                min_z_score: 1.5,
            },
            engagement_anomalies: ZScoreFilter {
                limit: 100,
                min_z_score: 1.5,
            },
            efficient_converters: EfficientConverters {
                limit: 50,
                min_sales: 1000.0,
                max_engagement: 5000.0,
                min_efficiency: 0.3,
            },
        }
    }
}

/// Persisted form of [`OutlierSettings`]; older entries may lack categories or fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierSettingsPartial {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub sales_outliers: Option<ZScoreFilterPatch>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub engagement_anomalies: Option<ZScoreFilterPatch>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::field"
    )]
    pub efficient_converters: Option<EfficientConvertersPatch>,
}

/// Category-scoped update of [`OutlierSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "fields", rename_all = "camelCase")]
pub enum OutlierPatch {
    SalesOutliers(ZScoreFilterPatch),
    EngagementAnomalies(ZScoreFilterPatch),
    EfficientConverters(EfficientConvertersPatch),
}

impl OutlierPatch {
    pub fn category(&self) -> &'static str {
        match self {
            OutlierPatch::SalesOutliers(_) => "salesOutliers",
            OutlierPatch::EngagementAnomalies(_) => "engagementAnomalies",
            OutlierPatch::EfficientConverters(_) => "efficientConverters",
        }
    }
}

/// Outlier detection settings domain
pub struct OutlierDomain;

impl SettingsDomain for OutlierDomain {
    const STORAGE_KEY: &'static str = "outlier-detection-settings";
    const TITLE: &'static str = "outlier detection";

    type Config = OutlierSettings;
    type Partial = OutlierSettingsPartial;
    type Patch = OutlierPatch;

    fn defaults() -> OutlierSettings {
        OutlierSettings::default()
    }

    fn merge(partial: Option<&OutlierSettingsPartial>, defaults: &OutlierSettings) -> OutlierSettings {
        let Some(partial) = partial else {
            return *defaults;
        };
        OutlierSettings {
            sales_outliers: merge_category(&defaults.sales_outliers, partial.sales_outliers.as_ref()),
            engagement_anomalies: merge_category(
                &defaults.engagement_anomalies,
                partial.engagement_anomalies.as_ref(),
            ),
            efficient_converters: merge_category(
                &defaults.efficient_converters,
                partial.efficient_converters.as_ref(),
            ),
        }
    }

    fn apply(current: &OutlierSettings, patch: &OutlierPatch) -> OutlierSettings {
        let partial = match patch {
            OutlierPatch::SalesOutliers(p) => OutlierSettingsPartial {
                sales_outliers: Some(*p),
                ..Default::default()
            },
            OutlierPatch::EngagementAnomalies(p) => OutlierSettingsPartial {
                engagement_anomalies: Some(*p),
                ..Default::default()
            },
            OutlierPatch::EfficientConverters(p) => OutlierSettingsPartial {
                efficient_converters: Some(*p),
                ..Default::default()
            },
        };
        Self::merge(Some(&partial), current)
    }

    fn validate(config: &OutlierSettings) -> Vec<String> {
        let mut v = Violations::new();

        let sales = &config.sales_outliers;
        v.check_count(LIMIT_100, sales.limit, "Sales outliers", "limit");
        v.check(Z_SCORE, sales.min_z_score, "Sales outliers", "minimum z-score");

        let engagement = &config.engagement_anomalies;
        v.check_count(LIMIT_200, engagement.limit, "Engagement anomalies", "limit");
        v.check(Z_SCORE, engagement.min_z_score, "Engagement anomalies", "minimum z-score");

        let converters = &config.efficient_converters;
        v.check_count(LIMIT_100, converters.limit, "Efficient converters", "limit");
        v.check(NON_NEGATIVE, converters.min_sales, "Efficient converters", "minimum sales");
        v.check(
            NON_NEGATIVE,
            converters.max_engagement,
            "Efficient converters",
            "maximum engagement",
        );
        v.check(EFFICIENCY, converters.min_efficiency, "Efficient converters", "minimum efficiency");

        v.require(
            !(converters.min_sales == 0.0 && converters.max_engagement == 0.0),
            "Efficient converters",
            "at least one threshold (minimum sales or maximum engagement) must be non-zero",
        );

        v.into_messages()
    }

    fn to_partial(config: &OutlierSettings) -> OutlierSettingsPartial {
        OutlierSettingsPartial {
            sales_outliers: Some((&config.sales_outliers).into()),
            engagement_anomalies: Some((&config.engagement_anomalies).into()),
            efficient_converters: Some((&config.efficient_converters).into()),
        }
    }
}
