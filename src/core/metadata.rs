//! Metadata for relationships.
//!
//! Metadata is stored as key-value pairs of strings. Material bindings use
//! it for the `bindMaterialAs` strength token.

use smallvec::SmallVec;
use std::fmt;

/// Metadata storage - key-value pairs of strings.
///
/// Uses SmallVec optimization for common case of few entries.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MetaData {
    entries: SmallVec<[(String, String); 2]>,
}

impl MetaData {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a metadata value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        // Update existing or add new
        for (k, v) in &mut self.entries {
            if k == &key {
                *v = value;
                return;
            }
        }
        self.entries.push((key, value));
    }

    /// Get a metadata value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a key and return its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over key-value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // === Common metadata keys ===

    /// Binding strength key on material binding relationships.
    pub const BIND_MATERIAL_AS_KEY: &'static str = "bindMaterialAs";

    /// Get the binding strength token, if authored.
    pub fn bind_material_as(&self) -> Option<&str> {
        self.get(Self::BIND_MATERIAL_AS_KEY)
    }

    /// Set the binding strength token.
    pub fn set_bind_material_as(&mut self, token: &str) {
        self.set(Self::BIND_MATERIAL_AS_KEY, token);
    }
}

impl fmt::Debug for MetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl FromIterator<(String, String)> for MetaData {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut meta = Self::new();
        for (k, v) in iter {
            meta.set(k, v);
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_basic() {
        let mut meta = MetaData::new();
        meta.set("key1", "value1");
        meta.set("key2", "value2");

        assert_eq!(meta.get("key1"), Some("value1"));
        assert_eq!(meta.get("key2"), Some("value2"));
        assert_eq!(meta.get("key3"), None);
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn test_metadata_update() {
        let mut meta = MetaData::new();
        meta.set("key", "value1");
        meta.set("key", "value2");

        assert_eq!(meta.get("key"), Some("value2"));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn test_metadata_remove() {
        let mut meta = MetaData::new();
        meta.set_bind_material_as("strongerThanDescendents");
        assert_eq!(meta.bind_material_as(), Some("strongerThanDescendents"));

        assert_eq!(meta.remove(MetaData::BIND_MATERIAL_AS_KEY).as_deref(), Some("strongerThanDescendents"));
        assert!(meta.is_empty());
        assert_eq!(meta.remove("missing"), None);
    }

    #[test]
    fn test_metadata_iter_order() {
        let meta: MetaData = vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ]
        .into_iter()
        .collect();

        let keys: Vec<&str> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
