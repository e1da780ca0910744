//! Generic settings engine shared by every analytics settings domain.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Field-wise override of a category by its partial form.
///
/// Fields set in the patch win; unset fields keep the base value.
pub trait Overlay<P> {
    fn overlay(&self, patch: &P) -> Self;
}

/// One settings domain: its storage key, Default Table, merge and validator.
pub trait SettingsDomain: 'static {
    /// Fixed key of the durable entry for this domain
    const STORAGE_KEY: &'static str;
    /// Human-readable name used in log messages
    const TITLE: &'static str;

    /// Fully populated configuration
    type Config: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Possibly-partial persisted form
    type Partial: Clone + Default + PartialEq + Debug + Serialize + DeserializeOwned;
    /// Update of exactly one category, tagged `{"category": .., "fields": {..}}` in JSON
    type Patch: Clone + Debug + Serialize + DeserializeOwned;

    /// Default Table. Every call returns a fresh value.
    fn defaults() -> Self::Config;

    /// Shallow per-category override of `defaults` by `partial`.
    fn merge(partial: Option<&Self::Partial>, defaults: &Self::Config) -> Self::Config;

    /// Override the fields of the patched category over its *current* value.
    /// Other categories are carried over unchanged.
    fn apply(current: &Self::Config, patch: &Self::Patch) -> Self::Config;

    /// All constraint violations, per-field checks first, cross-field last.
    fn validate(config: &Self::Config) -> Vec<String>;

    /// Fully populated partial form of a configuration.
    fn to_partial(config: &Self::Config) -> Self::Partial;
}

/// Merge a persisted partial value against the domain's Default Table.
pub fn merge_with_defaults<D: SettingsDomain>(partial: Option<&D::Partial>) -> D::Config {
    D::merge(partial, &D::defaults())
}

/// Merge helper for one category slot of a partial configuration.
pub(crate) fn merge_category<C, P>(base: &C, patch: Option<&P>) -> C
where
    C: Overlay<P> + Clone,
{
    match patch {
        Some(patch) => base.overlay(patch),
        None => base.clone(),
    }
}

/// Declares a settings category together with its partial form.
///
/// Generates:
/// - the category struct (camelCase JSON),
/// - `<Name>Patch` with every field optional and leniently deserialized,
/// - `Overlay<Patch>` for the category,
/// - `From<&Category>` for the patch (all fields set).
macro_rules! settings_category {
    (
        $(#[$meta:meta])*
        pub struct $name:ident / $patch:ident {
            $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: $ty, )*
        }

        #[doc = concat!("Partial form of [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $patch {
            $(
                #[serde(
                    default,
                    skip_serializing_if = "Option::is_none",
                    deserialize_with = "crate::shared::analytics_settings::lenient::field"
                )]
                pub $field: Option<$ty>,
            )*
        }

        impl crate::shared::analytics_settings::domain::Overlay<$patch> for $name {
            fn overlay(&self, patch: &$patch) -> Self {
                Self {
                    $( $field: patch.$field.unwrap_or(self.$field), )*
                }
            }
        }

        impl From<&$name> for $patch {
            fn from(category: &$name) -> Self {
                Self {
                    $( $field: Some(category.$field), )*
                }
            }
        }
    };
}

pub(crate) use settings_category;
