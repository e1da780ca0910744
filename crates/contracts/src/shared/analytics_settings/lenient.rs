//! Field-level type checking for persisted settings.
//!
//! Persisted JSON may be stale or hand-edited. A field whose value does not
//! have the declared type is read as absent, so merge falls back to the
//! default for that field only instead of discarding the whole entry.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `deserialize_with` target for optional settings fields.
///
/// Combine with `#[serde(default)]` so that a missing key is also `None`.
pub(crate) fn field<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
