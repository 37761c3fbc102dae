//! Identity data shared by every Passive House entity.
//!
//! Each entity carries an opaque string identifier (UUID-derived), a
//! display name and a free-form `user_data` map. Entities persist as
//! type-tagged JSON maps and are restored with a tag check.

use crate::random_id;
use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseData {
    pub identifier: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub user_data: Map<String, Value>,
}

impl BaseData {
    /// Creates identity data with a random identifier.
    pub fn new(display_name: &str) -> Self {
        Self {
            identifier: random_id(),
            display_name: display_name.to_string(),
            user_data: Map::new(),
        }
    }

    /// Creates identity data with a caller-supplied identifier.
    pub fn with_identifier(identifier: &str, display_name: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            display_name: display_name.to_string(),
            user_data: Map::new(),
        }
    }

    /// Returns a deep copy with the same identifier.
    ///
    /// `user_data` is cloned value by value so the duplicate can be
    /// mutated without touching the source entity.
    pub fn duplicate(&self) -> Self {
        Self {
            identifier: self.identifier.clone(),
            display_name: self.display_name.clone(),
            user_data: self.user_data.clone(),
        }
    }
}

impl Default for BaseData {
    fn default() -> Self {
        Self::new("")
    }
}

/// Types that expose a persistent identifier.
pub trait HasIdentifier {
    fn identifier(&self) -> &str;
}

// Delegate HasIdentifier to references (and smart pointers if useful)
impl<T: HasIdentifier + ?Sized> HasIdentifier for &T {
    fn identifier(&self) -> &str {
        (*self).identifier()
    }
}
impl<T: HasIdentifier + ?Sized> HasIdentifier for Box<T> {
    fn identifier(&self) -> &str {
        (**self).identifier()
    }
}

/// Sorting helpers for slices of `T: HasIdentifier`.
pub trait SortByIdentifier {
    /// Stable, ascending sort by `identifier()`.
    fn sort_by_identifier(&mut self);
}

impl<T: HasIdentifier> SortByIdentifier for [T] {
    fn sort_by_identifier(&mut self) {
        self.sort_by(|a, b| a.identifier().cmp(b.identifier()));
    }
}

/// Serializes `obj` to a JSON map carrying a `"type"` tag.
pub fn tagged_value<T: Serialize>(obj: &T, type_name: &str) -> Result<Value> {
    let mut value = serde_json::to_value(obj)
        .with_context(|| format!("Failed to serialize: {}", type_name))?;
    let map = value
        .as_object_mut()
        .ok_or_else(|| anyhow!("Expected a JSON map for: {}", type_name))?;
    map.insert("type".to_string(), Value::String(type_name.to_string()));
    Ok(value)
}

/// Restores an entity from a type-tagged JSON map.
///
/// Fails if the `"type"` tag does not match `expected`, reporting both
/// the received and the expected name.
pub fn from_tagged_value<T: DeserializeOwned>(value: &Value, expected: &str) -> Result<T> {
    let received = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Missing 'type' tag, expected: {}", expected))?;
    if received != expected {
        return Err(anyhow!(
            "Type mismatch: received '{}', expected '{}'",
            received,
            expected
        ));
    }
    serde_json::from_value(value.clone())
        .with_context(|| format!("Failed to deserialize: {}", expected))
}
