//! Context provider for the analytics settings accessors.

use std::sync::Arc;

use leptos::prelude::*;

use super::accessor::{
    ChampionSettingsAccessor, OutlierSettingsAccessor, SegmentSettingsAccessor, SettingsAccessor,
};
use super::storage::{BrowserStorage, KeyValueStore};

/// All analytics settings accessors, sharing one key-value store.
#[derive(Clone)]
pub struct AnalyticsSettingsContext {
    pub outliers: OutlierSettingsAccessor,
    pub champions: ChampionSettingsAccessor,
    pub segments: SegmentSettingsAccessor,
}

impl AnalyticsSettingsContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            outliers: SettingsAccessor::new(Arc::clone(&store)),
            champions: SettingsAccessor::new(Arc::clone(&store)),
            segments: SettingsAccessor::new(store),
        }
    }

    pub fn ensure_loaded(&self) {
        self.outliers.ensure_loaded();
        self.champions.ensure_loaded();
        self.segments.ensure_loaded();
    }
}

/// Provides analytics settings context to children components.
#[component]
pub fn AnalyticsSettingsProvider(children: Children) -> impl IntoView {
    let context = AnalyticsSettingsContext::new(Arc::new(BrowserStorage));

    // Restore persisted settings once mounted
    let loader = context.clone();
    Effect::new(move |_| loader.ensure_loaded());

    provide_context(context);

    children()
}

/// Hook to use the analytics settings context.
pub fn use_analytics_settings() -> AnalyticsSettingsContext {
    use_context::<AnalyticsSettingsContext>()
        .expect("AnalyticsSettingsContext not found. Wrap your app with AnalyticsSettingsProvider.")
}

pub fn use_outlier_settings() -> OutlierSettingsAccessor {
    use_analytics_settings().outliers
}

pub fn use_champion_settings() -> ChampionSettingsAccessor {
    use_analytics_settings().champions
}

pub fn use_segment_settings() -> SegmentSettingsAccessor {
    use_analytics_settings().segments
}
