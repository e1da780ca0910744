pub mod analytics_settings;
