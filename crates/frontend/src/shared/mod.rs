pub mod analytics_settings;
pub mod api_utils;
