//! Reactive accessor: the single owner of a domain's in-memory settings.
//!
//! Starts with the Default Table (`is_loaded == false`), loads and merges
//! the persisted value on first observation, then republishes every update
//! through an `RwSignal` and writes it back to storage.

use std::marker::PhantomData;
use std::sync::Arc;

use contracts::shared::analytics_settings::{
    merge_with_defaults, ChampionDomain, OutlierDomain, SegmentDomain, SettingsDomain,
};
use leptos::prelude::*;
use thiserror::Error;

use super::storage::{self, KeyValueStore};

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("unknown settings category or malformed fields: {0}")]
    Patch(#[from] serde_json::Error),
    #[error("fields of '{category}' were rejected: {}", fields.join(", "))]
    RejectedFields {
        category: String,
        fields: Vec<String>,
    },
}

pub struct SettingsAccessor<D: SettingsDomain> {
    settings: RwSignal<D::Config>,
    loaded: RwSignal<bool>,
    store: Arc<dyn KeyValueStore>,
    _domain: PhantomData<fn() -> D>,
}

pub type OutlierSettingsAccessor = SettingsAccessor<OutlierDomain>;
pub type ChampionSettingsAccessor = SettingsAccessor<ChampionDomain>;
pub type SegmentSettingsAccessor = SettingsAccessor<SegmentDomain>;

impl<D: SettingsDomain> Clone for SettingsAccessor<D> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings,
            loaded: self.loaded,
            store: Arc::clone(&self.store),
            _domain: PhantomData,
        }
    }
}

impl<D: SettingsDomain> SettingsAccessor<D> {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            settings: RwSignal::new(D::defaults()),
            loaded: RwSignal::new(false),
            store,
            _domain: PhantomData,
        }
    }

    /// Load and merge the persisted value. Runs once per accessor.
    pub fn ensure_loaded(&self) {
        if self.loaded.get_untracked() {
            return;
        }
        let persisted = storage::load::<D>(self.store.as_ref());
        let config = merge_with_defaults::<D>(persisted.as_ref());
        log::debug!(
            "{} settings loaded ({})",
            D::TITLE,
            if persisted.is_some() { "persisted" } else { "defaults" }
        );
        self.settings.set(config);
        self.loaded.set(true);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    /// Current configuration (tracked).
    pub fn settings(&self) -> D::Config {
        self.ensure_loaded();
        self.settings.get()
    }

    pub fn settings_untracked(&self) -> D::Config {
        self.ensure_loaded();
        self.settings.get_untracked()
    }

    /// Read-only handle for views.
    pub fn signal(&self) -> ReadSignal<D::Config> {
        self.ensure_loaded();
        self.settings.read_only()
    }

    /// Override fields of one category over its current value, publish and persist.
    ///
    /// The new value is visible immediately even if the write fails.
    pub fn update_settings(&self, patch: &D::Patch) -> D::Config {
        self.ensure_loaded();
        let next = D::apply(&self.settings.get_untracked(), patch);
        self.settings.set(next.clone());
        storage::save::<D>(self.store.as_ref(), &next);
        next
    }

    /// Same as [`Self::update_settings`] with the category given by name, e.g.
    /// `update_category("salesOutliers", json!({"limit": 10}))`.
    ///
    /// Every key of `fields` must name a field of the category and carry a
    /// value of its type. Otherwise nothing is applied or persisted and the
    /// offending keys are returned in [`UpdateError::RejectedFields`].
    pub fn update_category(
        &self,
        category: &str,
        fields: serde_json::Value,
    ) -> Result<D::Config, UpdateError> {
        let patch: D::Patch = serde_json::from_value(serde_json::json!({
            "category": category,
            "fields": fields.clone(),
        }))?;

        let accepted = serde_json::to_value(&patch)?;
        let accepted = accepted.get("fields").and_then(|f| f.as_object());
        let rejected: Vec<String> = fields
            .as_object()
            .map(|requested| {
                requested
                    .keys()
                    .filter(|key| !accepted.is_some_and(|a| a.contains_key(key.as_str())))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if !rejected.is_empty() {
            log::warn!(
                "{} settings: rejected fields of '{}': {}",
                D::TITLE,
                category,
                rejected.join(", ")
            );
            return Err(UpdateError::RejectedFields {
                category: category.to_string(),
                fields: rejected,
            });
        }

        Ok(self.update_settings(&patch))
    }

    /// Replace the whole configuration and persist it.
    pub fn save_settings(&self, config: D::Config) {
        storage::save::<D>(self.store.as_ref(), &config);
        self.settings.set(config);
        self.loaded.set(true);
    }

    /// Back to the Default Table; the durable entry is removed.
    pub fn reset(&self) -> D::Config {
        let defaults = storage::reset_to_defaults::<D>(self.store.as_ref());
        self.settings.set(defaults.clone());
        self.loaded.set(true);
        defaults
    }

    /// Violations of the current configuration (tracked).
    pub fn validate(&self) -> Vec<String> {
        self.ensure_loaded();
        self.settings.with(|config| D::validate(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::analytics_settings::storage::MemoryStorage;
    use contracts::shared::analytics_settings::outliers::{
        EfficientConvertersPatch, ZScoreFilterPatch,
    };
    use contracts::shared::analytics_settings::OutlierPatch;

    fn accessor(store: &MemoryStorage) -> OutlierSettingsAccessor {
        SettingsAccessor::new(Arc::new(store.clone()))
    }

    #[test]
    fn test_starts_uninitialized_with_defaults() {
        let store = MemoryStorage::new();
        store
            .set_item(OutlierDomain::STORAGE_KEY, r#"{"salesOutliers":{"limit":5}}"#)
            .unwrap();
        let settings = accessor(&store);
        assert!(!settings.loaded.get_untracked());
        assert_eq!(settings.settings.get_untracked(), OutlierDomain::defaults());
    }

    #[test]
    fn test_first_read_merges_persisted_value() {
        let store = MemoryStorage::new();
        store
            .set_item(OutlierDomain::STORAGE_KEY, r#"{"salesOutliers":{"limit":5}}"#)
            .unwrap();
        let settings = accessor(&store);

        let current = settings.settings_untracked();
        assert!(settings.loaded.get_untracked());
        assert_eq!(current.sales_outliers.limit, 5);
        assert_eq!(current.sales_outliers.min_z_score, 1.5);
        assert_eq!(current.engagement_anomalies, OutlierDomain::defaults().engagement_anomalies);
    }

    #[test]
    fn test_load_is_one_shot() {
        let store = MemoryStorage::new();
        let settings = accessor(&store);
        settings.ensure_loaded();

        store
            .set_item(OutlierDomain::STORAGE_KEY, r#"{"salesOutliers":{"limit":5}}"#)
            .unwrap();
        assert_eq!(settings.settings_untracked(), OutlierDomain::defaults());
    }

    #[test]
    fn test_update_changes_only_named_field() {
        let store = MemoryStorage::new();
        let settings = accessor(&store);
        let before = settings.settings_untracked();

        settings.update_settings(&OutlierPatch::EngagementAnomalies(ZScoreFilterPatch {
            min_z_score: Some(2.0),
            ..Default::default()
        }));

        let after = settings.settings_untracked();
        assert_eq!(after.engagement_anomalies.min_z_score, 2.0);
        assert_eq!(after.engagement_anomalies.limit, before.engagement_anomalies.limit);
        assert_eq!(after.sales_outliers, before.sales_outliers);
        assert_eq!(after.efficient_converters, before.efficient_converters);
    }

    #[test]
    fn test_update_is_persisted() {
        let store = MemoryStorage::new();
        accessor(&store).update_settings(&OutlierPatch::EfficientConverters(
            EfficientConvertersPatch {
                max_engagement: Some(8000.0),
                ..Default::default()
            },
        ));

        let reopened = accessor(&store);
        assert_eq!(reopened.settings_untracked().efficient_converters.max_engagement, 8000.0);
    }

    #[test]
    fn test_update_before_first_read_keeps_persisted_fields() {
        let store = MemoryStorage::new();
        store
            .set_item(OutlierDomain::STORAGE_KEY, r#"{"salesOutliers":{"limit":5}}"#)
            .unwrap();
        let settings = accessor(&store);

        let updated = settings.update_settings(&OutlierPatch::SalesOutliers(ZScoreFilterPatch {
            min_z_score: Some(3.0),
            ..Default::default()
        }));
        assert_eq!(updated.sales_outliers.limit, 5);
        assert_eq!(updated.sales_outliers.min_z_score, 3.0);
    }

    #[test]
    fn test_update_by_category_name() {
        let store = MemoryStorage::new();
        let settings = accessor(&store);

        let updated = settings
            .update_category("salesOutliers", serde_json::json!({"limit": 10}))
            .unwrap();
        assert_eq!(updated.sales_outliers.limit, 10);

        assert!(settings
            .update_category("noSuchCategory", serde_json::json!({"limit": 10}))
            .is_err());
        assert_eq!(settings.settings_untracked(), updated);
    }

    #[test]
    fn test_update_category_rejects_mistyped_fields() {
        let store = MemoryStorage::new();
        let settings = accessor(&store);

        let err = settings
            .update_category(
                "salesOutliers",
                serde_json::json!({"limit": "10", "minZScore": 2.5, "legacy": 1}),
            )
            .unwrap_err();
        match err {
            UpdateError::RejectedFields { category, mut fields } => {
                fields.sort();
                assert_eq!(category, "salesOutliers");
                assert_eq!(fields, vec!["legacy".to_string(), "limit".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }

        assert_eq!(settings.settings_untracked(), OutlierDomain::defaults());
        assert_eq!(store.get_item(OutlierDomain::STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_reset_restores_defaults_and_clears_storage() {
        let store = MemoryStorage::new();
        let settings = accessor(&store);
        settings.update_settings(&OutlierPatch::SalesOutliers(ZScoreFilterPatch {
            limit: Some(10),
            ..Default::default()
        }));

        let reset = settings.reset();
        assert_eq!(reset, OutlierDomain::defaults());
        assert_eq!(settings.settings_untracked(), OutlierDomain::defaults());
        assert!(settings.loaded.get_untracked());
        assert_eq!(storage::load::<OutlierDomain>(&store), None);
    }

    #[test]
    fn test_failed_writes_keep_memory_authoritative() {
        let store = MemoryStorage::failing_writes();
        let settings = accessor(&store);
        settings.update_settings(&OutlierPatch::SalesOutliers(ZScoreFilterPatch {
            limit: Some(20),
            ..Default::default()
        }));

        assert_eq!(settings.settings_untracked().sales_outliers.limit, 20);
        assert_eq!(storage::load::<OutlierDomain>(&store), None);
    }

    #[test]
    fn test_save_settings_replaces_everything() {
        let store = MemoryStorage::new();
        let settings = accessor(&store);
        let mut replacement = OutlierDomain::defaults();
        replacement.sales_outliers.limit = 0;
        replacement.efficient_converters.min_efficiency = 2.0;

        settings.save_settings(replacement);
        assert_eq!(settings.settings_untracked(), replacement);
        // validation is advisory, the invalid value is still stored
        assert_eq!(settings.validate().len(), 1);
        assert_eq!(accessor(&store).settings_untracked(), replacement);
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStorage::new();
        let settings = accessor(&store);
        let view = settings.clone();
        settings.update_settings(&OutlierPatch::SalesOutliers(ZScoreFilterPatch {
            limit: Some(42),
            ..Default::default()
        }));
        assert_eq!(view.settings_untracked().sales_outliers.limit, 42);
    }
}
