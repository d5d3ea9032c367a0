//! Notify-then-perform entry points for every tracked operation family.
//!
//! These functions are what rewritten call sites execute: each one reports
//! the access to the currently installed listener and performs (or
//! delegates to) the real operation, returning its exact result. The
//! interceptors in [`crate::interceptors`] parse erased call shapes and
//! funnel into these. The `consumer` argument names the build-logic unit
//! making the call; it is attribution only and never interpreted.

use crate::call::{Encoding, EntryFilter};
use crate::environ;
use crate::listener::{current_listener, AccessListener};
use crate::paths;
use crate::props::{self, PropertyMap, PropValue};
use crate::snapshot::{TrackedEnv, TrackedProperties};
use crate::spawn::{self, CommandSpec};
use envtrace_core::Result;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Child;
use std::sync::Arc;

fn listener() -> Arc<dyn AccessListener> {
    current_listener()
}

/// Read a property. The queried notification carries the value actually
/// observed, whether or not a default was supplied; the default only
/// affects the returned value.
pub fn property(key: &str, default: Option<&str>, consumer: &str) -> Option<String> {
    let value = props::store().get_str(key);
    listener().property_queried(key, value.as_deref(), consumer);
    value.or_else(|| default.map(str::to_string))
}

/// Read a property as an integer. The notification carries the raw string
/// value; an absent or unparseable value yields the default.
pub fn int_property(key: &str, default: Option<i64>, consumer: &str) -> Option<i64> {
    let raw = props::store().get_str(key);
    listener().property_queried(key, raw.as_deref(), consumer);
    raw.and_then(|s| s.trim().parse::<i64>().ok()).or(default)
}

/// Read a property as a flag: `true` only when the value is the string
/// "true", case-insensitively.
pub fn bool_property(key: &str, consumer: &str) -> bool {
    let raw = props::store().get_str(key);
    listener().property_queried(key, raw.as_deref(), consumer);
    raw.is_some_and(|s| s.eq_ignore_ascii_case("true"))
}

/// Write a property, returning the previous string value. The previous
/// value is read and reported as queried before the change is reported.
pub fn set_property(key: &str, value: &str, consumer: &str) -> Option<String> {
    let new_value = PropValue::from(value);
    let old = props::store().set(key, new_value.clone());
    let listener = listener();
    listener.property_queried(key, old.as_ref().and_then(PropValue::as_str), consumer);
    listener.property_changed(key, &new_value, consumer);
    old.and_then(PropValue::into_string)
}

/// Remove a property, returning the previous string value.
pub fn remove_property(key: &str, consumer: &str) -> Option<String> {
    let old = props::store().remove(key);
    let listener = listener();
    listener.property_queried(key, old.as_ref().and_then(PropValue::as_str), consumer);
    listener.property_removed(key, consumer);
    old.and_then(PropValue::into_string)
}

/// The full property set as a lazy-tracking view. No notification is
/// emitted until an individual entry is accessed through the view.
pub fn properties(consumer: &str) -> TrackedProperties {
    TrackedProperties::new(consumer)
}

/// Replace the whole property set. Reports cleared once, then changed once
/// per entry in the replacement set's iteration order, then applies the
/// replacement. All notifications go to one listener snapshot.
pub fn replace_properties(entries: PropertyMap, consumer: &str) {
    let listener = listener();
    listener.properties_cleared(consumer);
    for (key, value) in &entries {
        listener.property_changed(key, value, consumer);
    }
    props::store().replace(entries);
}

/// Read an environment variable.
pub fn env_var(key: &str, consumer: &str) -> Option<String> {
    let value = environ::var(key);
    listener().env_queried(key, value.as_deref(), consumer);
    value
}

/// The full environment as a lazy-tracking, read-only view.
pub fn env_vars(consumer: &str) -> TrackedEnv {
    TrackedEnv::new(consumer)
}

/// Probe whether a file system entry exists.
pub fn entry_exists(path: &Path, consumer: &str) -> bool {
    listener().fs_entry_observed(&paths::absolute_of(path), consumer);
    path.exists()
}

/// Probe whether a file system entry is a regular file.
pub fn entry_is_file(path: &Path, consumer: &str) -> bool {
    listener().fs_entry_observed(&paths::absolute_of(path), consumer);
    path.is_file()
}

/// Probe whether a file system entry is a directory.
pub fn entry_is_dir(path: &Path, consumer: &str) -> bool {
    listener().fs_entry_observed(&paths::absolute_of(path), consumer);
    path.is_dir()
}

/// List a directory's entries, optionally filtered.
pub fn list_entries(
    path: &Path,
    filter: Option<&EntryFilter>,
    consumer: &str,
) -> Result<Vec<PathBuf>> {
    listener().directory_listed(&paths::absolute_of(path), consumer);
    crate::fsops::list_dir(path, filter)
}

/// Read a whole file as text, optionally decoding a named encoding.
pub fn read_to_string(
    path: &Path,
    encoding: Option<&Encoding>,
    consumer: &str,
) -> Result<String> {
    listener().file_opened(&paths::absolute_of(path), consumer);
    crate::fsops::read_with_encoding(path, encoding)
}

/// Open a streaming read handle for a file.
pub fn open(path: &Path, consumer: &str) -> Result<File> {
    listener().file_opened(&paths::absolute_of(path), consumer);
    crate::fsops::open_stream(path)
}

/// Report a file open performed outside this layer.
pub fn file_opened(path: &Path, consumer: &str) {
    listener().file_opened(&paths::absolute_of(path), consumer);
}

/// Report a wholesale file observation performed outside this layer.
pub fn file_observed(path: &Path, consumer: &str) {
    listener().file_observed(&paths::absolute_of(path), consumer);
}

/// Launch a process. The joined command line is reported before the spawn
/// is attempted, so a failed launch is still an observed access.
pub fn launch(spec: &CommandSpec, consumer: &str) -> Result<Child> {
    listener().process_started(&spec.command_line(), consumer);
    spec.spawn()
}

/// Launch a pipeline. Every stage is reported, in stage order, before any
/// stage starts, all against one listener snapshot.
pub fn launch_pipeline(stages: &[CommandSpec], consumer: &str) -> Result<Vec<Child>> {
    let listener = listener();
    for stage in stages {
        listener.process_started(&stage.command_line(), consumer);
    }
    spawn::start_pipeline(stages)
}
