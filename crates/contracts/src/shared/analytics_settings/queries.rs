//! Query parameters accepted by the analytics API.
//!
//! Field names follow the API (snake_case); values come straight from a
//! merged configuration.

use serde::{Deserialize, Serialize};

use super::champions::{ChampionSettings, ChampionType};
use super::outliers::{EfficientConverters, ZScoreFilter};

/// `GET /api/v1/analytics/outliers/sales` and `/outliers/engagement`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScoreQuery {
    pub limit: u32,
    pub min_z_score: f64,
}

impl From<&ZScoreFilter> for ZScoreQuery {
    fn from(filter: &ZScoreFilter) -> Self {
        Self {
            limit: filter.limit,
            min_z_score: filter.min_z_score,
        }
    }
}

/// `GET /api/v1/analytics/patterns/efficient-converters`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficientConvertersQuery {
    pub limit: u32,
    pub min_sales: f64,
    pub max_engagement: f64,
    pub min_efficiency: f64,
}

impl From<&EfficientConverters> for EfficientConvertersQuery {
    fn from(c: &EfficientConverters) -> Self {
        Self {
            limit: c.limit,
            min_sales: c.min_sales,
            max_engagement: c.max_engagement,
            min_efficiency: c.min_efficiency,
        }
    }
}

/// `GET /api/v1/analytics/champions`
///
/// Only the parameters of the selected champion type are set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChampionsQuery {
    pub limit: u32,
    pub champion_type: ChampionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_sales: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_engagement: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_potential_eng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_potential_sales: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub med_potential_eng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub med_potential_sales: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balanced_min_eng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balanced_min_sales: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eng_normalizer: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_normalizer: Option<f64>,
}

impl From<&ChampionSettings> for ChampionsQuery {
    fn from(s: &ChampionSettings) -> Self {
        let base = Self {
            limit: s.general.limit,
            champion_type: s.general.champion_type,
            ..Default::default()
        };
        match s.general.champion_type {
            ChampionType::Overall => Self {
                engagement_weight: Some(s.overall.engagement_weight),
                sales_weight: Some(s.overall.sales_weight),
                conversion_weight: Some(s.overall.conversion_weight),
                ..base
            },
            ChampionType::Sales => Self {
                min_sales: Some(s.sales.min_sales),
                ..base
            },
            ChampionType::Engagement => Self {
                min_engagement: Some(s.engagement.min_engagement),
                high_potential_eng: Some(s.engagement.high_potential_engagement),
                high_potential_sales: Some(s.engagement.high_potential_sales),
                med_potential_eng: Some(s.engagement.medium_potential_engagement),
                med_potential_sales: Some(s.engagement.medium_potential_sales),
                ..base
            },
            ChampionType::Balanced => Self {
                balanced_min_eng: Some(s.balanced.min_engagement),
                balanced_min_sales: Some(s.balanced.min_sales),
                eng_normalizer: Some(s.balanced.engagement_normalizer),
                sales_normalizer: Some(s.balanced.sales_normalizer),
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_champions_query_sends_only_selected_type() {
        let mut settings = ChampionSettings::default();
        settings.general.champion_type = ChampionType::Balanced;
        settings.balanced.sales_normalizer = 400.0;

        let query = ChampionsQuery::from(&settings);
        let json = serde_json::to_value(query).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();

        assert_eq!(json["champion_type"], "balanced");
        assert_eq!(json["sales_normalizer"], 400.0);
        assert_eq!(
            keys,
            vec![
                "balanced_min_eng",
                "balanced_min_sales",
                "champion_type",
                "eng_normalizer",
                "limit",
                "sales_normalizer",
            ]
        );
    }

    #[test]
    fn test_z_score_query_from_filter() {
        let filter = ZScoreFilter {
            limit: 20,
            min_z_score: 2.5,
        };
        assert_eq!(
            ZScoreQuery::from(&filter),
            ZScoreQuery {
                limit: 20,
                min_z_score: 2.5
            }
        );
    }
}
