//! The process-wide property store.
//!
//! Build logic reads and writes a single mutable configuration map shared by
//! the whole process. The interception layer wraps every access to it; the
//! store itself is the undecorated "real operation" target.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Ordered property map. Iteration order is insertion order, which bulk
/// replacement notifications rely on.
pub type PropertyMap = IndexMap<String, PropValue>;

/// A property value. Keys are always strings; values are not.
///
/// Only string values can be influenced by external configuration, so only
/// they participate in access tracking. The other variants exist to let
/// build logic stash richer values without the tracking layer getting in
/// the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl PropValue {
    /// String view of the value, `None` for non-string variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

/// Process-wide mutable property map behind a read-write lock.
///
/// Reads vastly outnumber writes during a build, so the lock is only ever
/// held for the duration of a single map operation.
#[derive(Debug, Default)]
pub struct PropertyStore {
    entries: RwLock<PropertyMap>,
}

static STORE: Lazy<PropertyStore> = Lazy::new(PropertyStore::default);

/// The process-wide store instance.
pub fn store() -> &'static PropertyStore {
    &STORE
}

impl PropertyStore {
    pub fn get(&self, key: &str) -> Option<PropValue> {
        self.entries.read().get(key).cloned()
    }

    /// String view of a property, `None` when absent or non-string.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .get(key)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Insert or update a property, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: PropValue) -> Option<PropValue> {
        self.entries.write().insert(key.into(), value)
    }

    /// Remove a property, returning the previous value.
    pub fn remove(&self, key: &str) -> Option<PropValue> {
        self.entries.write().shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Replace the whole map with `entries`.
    pub fn replace(&self, entries: PropertyMap) {
        *self.entries.write() = entries;
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Eager, untracked copy of the current entries.
    pub fn snapshot(&self) -> PropertyMap {
        self.entries.read().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_returns_previous_value() {
        let store = PropertyStore::default();
        assert_eq!(store.set("a", PropValue::from("1")), None);
        assert_eq!(store.set("a", PropValue::from("2")), Some(PropValue::from("1")));
        assert_eq!(store.get_str("a"), Some("2".to_string()));
    }

    #[test]
    fn get_str_hides_non_string_values() {
        let store = PropertyStore::default();
        store.set("n", PropValue::from(42));
        store.set("b", PropValue::from(true));
        assert_eq!(store.get_str("n"), None);
        assert_eq!(store.get_str("b"), None);
        assert_eq!(store.get("n"), Some(PropValue::Int(42)));
        assert_eq!(store.get("b"), Some(PropValue::Bool(true)));
    }

    #[test]
    fn replace_preserves_map_order() {
        let store = PropertyStore::default();
        store.set("old", PropValue::from("x"));

        let mut next = PropertyMap::new();
        next.insert("b".to_string(), PropValue::from("2"));
        next.insert("a".to_string(), PropValue::from("1"));
        store.replace(next);

        assert_eq!(store.keys(), vec!["b".to_string(), "a".to_string()]);
        assert!(!store.contains("old"));
    }
}
