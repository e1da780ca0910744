//! Analytics settings: persistence, reactive access and API parameters.

pub mod accessor;
pub mod api;
pub mod context;
pub mod storage;

pub use accessor::{
    ChampionSettingsAccessor, OutlierSettingsAccessor, SegmentSettingsAccessor, SettingsAccessor,
    UpdateError,
};
pub use context::{
    use_analytics_settings, use_champion_settings, use_outlier_settings, use_segment_settings,
    AnalyticsSettingsContext, AnalyticsSettingsProvider,
};
pub use storage::{BrowserStorage, KeyValueStore, MemoryStorage, StorageError};
