//! Analytics settings domains
//!
//! User-tunable parameters of the analytics API, grouped into three domains
//! (outlier detection, champion tiers, segment classification). Each domain
//! provides a Default Table, a partial persisted form, merge and a validator
//! through [`SettingsDomain`].
//!
//! ```rust,ignore
//! use contracts::shared::analytics_settings::{merge_with_defaults, OutlierDomain, SettingsDomain};
//!
//! let config = merge_with_defaults::<OutlierDomain>(persisted.as_ref());
//! for violation in OutlierDomain::validate(&config) {
//!     println!("{}", violation);
//! }
//! ```

mod domain;
mod lenient;

pub mod champions;
pub mod outliers;
pub mod queries;
pub mod segments;
pub mod validation;

pub use champions::{ChampionDomain, ChampionPatch, ChampionSettings, ChampionType};
pub use domain::{merge_with_defaults, Overlay, SettingsDomain};
pub use outliers::{OutlierDomain, OutlierPatch, OutlierSettings};
pub use segments::{SegmentDomain, SegmentPatch, SegmentSettings};
pub use validation::{NumberRule, Violations};
