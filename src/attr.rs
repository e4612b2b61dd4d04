//! Attribute mapping for tree elements
//!
//! Keys are unique and order is irrelevant: two mappings are equal when
//! they hold the same key/value pairs, however they were inserted.

use rustc_hash::FxHashMap;

/// Element attributes as an unordered key-value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(FxHashMap<String, String>);

impl Attrs {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Check if an attribute exists
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Set an attribute value (insert or update), returning the old value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Remove an attribute by name, returning the old value if present
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over attribute names (arbitrary order)
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over `(name, value)` pairs (arbitrary order)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attrs {
    /// Later duplicates overwrite earlier ones
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// =============================================================================
// Tests
// =============================================================================
