//! Analytics API URLs built from the current settings.

use contracts::shared::analytics_settings::queries::{
    ChampionsQuery, EfficientConvertersQuery, ZScoreQuery,
};
use contracts::shared::analytics_settings::{ChampionSettings, OutlierSettings};

use crate::shared::api_utils::api_url_with_query;

pub fn sales_outliers_url(settings: &OutlierSettings) -> String {
    api_url_with_query(
        "/api/v1/analytics/outliers/sales",
        &ZScoreQuery::from(&settings.sales_outliers),
    )
}

pub fn engagement_anomalies_url(settings: &OutlierSettings) -> String {
    api_url_with_query(
        "/api/v1/analytics/outliers/engagement",
        &ZScoreQuery::from(&settings.engagement_anomalies),
    )
}

pub fn efficient_converters_url(settings: &OutlierSettings) -> String {
    api_url_with_query(
        "/api/v1/analytics/patterns/efficient-converters",
        &EfficientConvertersQuery::from(&settings.efficient_converters),
    )
}

pub fn champions_url(settings: &ChampionSettings) -> String {
    api_url_with_query("/api/v1/analytics/champions", &ChampionsQuery::from(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::analytics_settings::ChampionType;

    #[test]
    fn test_sales_outliers_url() {
        let mut settings = OutlierSettings::default();
        settings.sales_outliers.limit = 20;
        settings.sales_outliers.min_z_score = 2.5;
        assert_eq!(
            sales_outliers_url(&settings),
            "/api/v1/analytics/outliers/sales?limit=20&min_z_score=2.5"
        );
    }

    #[test]
    fn test_efficient_converters_url_carries_all_cutoffs() {
        let mut settings = OutlierSettings::default();
        settings.efficient_converters.min_efficiency = 0.75;
        let url = efficient_converters_url(&settings);
        assert!(url.starts_with("/api/v1/analytics/patterns/efficient-converters?limit=50&"));
        assert!(url.contains("min_sales="));
        assert!(url.contains("max_engagement="));
        assert!(url.ends_with("min_efficiency=0.75"));
    }

    #[test]
    fn test_champions_url_for_sales_type() {
        let mut settings = ChampionSettings::default();
        settings.general.champion_type = ChampionType::Sales;
        settings.general.limit = 25;
        settings.sales.min_sales = 1500.5;
        assert_eq!(
            champions_url(&settings),
            "/api/v1/analytics/champions?limit=25&champion_type=sales&min_sales=1500.5"
        );
    }
}
