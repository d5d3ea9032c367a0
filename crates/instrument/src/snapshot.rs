//! Lazy-tracking views over bulk property and environment snapshots.
//!
//! Reading the full property set or environment must not flood the
//! listener with one notification per entry up front; build logic often
//! grabs the whole map and touches two keys. These views hold no copied
//! data: every read goes to the live backing store and is reported at the
//! moment it happens, so accessing the same entry twice reports twice.

use crate::environ;
use crate::listener::{current_listener, AccessListener};
use crate::props::{self, PropValue};
use std::sync::Arc;

/// View over the live process-wide property store that reports each entry
/// access.
///
/// Only string-valued (or absent) entries are tracked; values that are not
/// strings cannot be influenced by external configuration and pass through
/// untracked.
#[derive(Debug, Clone)]
pub struct TrackedProperties {
    consumer: String,
}

impl TrackedProperties {
    pub(crate) fn new(consumer: impl Into<String>) -> Self {
        Self {
            consumer: consumer.into(),
        }
    }

    fn report_read(&self, listener: &Arc<dyn AccessListener>, key: &str, value: Option<&PropValue>) {
        match value {
            None => listener.property_queried(key, None, &self.consumer),
            Some(PropValue::Str(s)) => listener.property_queried(key, Some(s), &self.consumer),
            Some(_) => {}
        }
    }

    pub fn get(&self, key: &str) -> Option<PropValue> {
        let value = props::store().get(key);
        self.report_read(&current_listener(), key, value.as_ref());
        value
    }

    /// String view of an entry; a tracked read like [`TrackedProperties::get`].
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(PropValue::into_string)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or update an entry, returning the previous value. Reports the
    /// read of the previous value and the change, against one listener.
    pub fn set(&self, key: &str, value: PropValue) -> Option<PropValue> {
        let old = props::store().set(key, value.clone());
        let listener = current_listener();
        self.report_read(&listener, key, old.as_ref());
        listener.property_changed(key, &value, &self.consumer);
        old
    }

    /// Remove an entry, returning the previous value.
    pub fn remove(&self, key: &str) -> Option<PropValue> {
        let old = props::store().remove(key);
        let listener = current_listener();
        self.report_read(&listener, key, old.as_ref());
        listener.property_removed(key, &self.consumer);
        old
    }

    /// Remove every entry.
    pub fn clear(&self) {
        current_listener().properties_cleared(&self.consumer);
        props::store().clear();
    }

    /// Every entry, reported entry-by-entry as the enumeration observes it.
    pub fn entries(&self) -> Vec<(String, PropValue)> {
        let entries = props::store().snapshot();
        let listener = current_listener();
        for (key, value) in &entries {
            self.report_read(&listener, key, Some(value));
        }
        entries.into_iter().collect()
    }

    /// Entry count; an aggregate read, not tracked per entry.
    pub fn len(&self) -> usize {
        props::store().len()
    }

    pub fn is_empty(&self) -> bool {
        props::store().is_empty()
    }
}

/// Read-only view over the live process environment that reports each
/// variable access. The environment cannot be written through this layer,
/// so only queried notifications are ever produced.
#[derive(Debug, Clone)]
pub struct TrackedEnv {
    consumer: String,
}

impl TrackedEnv {
    pub(crate) fn new(consumer: impl Into<String>) -> Self {
        Self {
            consumer: consumer.into(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = environ::var(key);
        current_listener().env_queried(key, value.as_deref(), &self.consumer);
        value
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Every variable, reported entry-by-entry as the enumeration observes
    /// it.
    pub fn entries(&self) -> Vec<(String, String)> {
        let vars = environ::vars();
        let listener = current_listener();
        for (key, value) in &vars {
            listener.env_queried(key, Some(value), &self.consumer);
        }
        vars
    }

    /// Variable count; an aggregate read, not tracked per entry.
    pub fn len(&self) -> usize {
        environ::vars().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
