//! The access listener capability set and the process-wide listener slot.
//!
//! Exactly one listener is active at any instant. The cache / up-to-date
//! engine installs its implementation at build start and discards it at
//! build completion; every interception path reads the slot at the moment
//! of the call. Replacement is last-write-wins and never retroactive: a
//! logical operation that already cloned the listener out of the slot keeps
//! using that clone for every notification it emits.

use crate::props::PropValue;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Receives one notification per tracked environment-sensitive access.
///
/// Implementations must be cheap and non-blocking; they run inline on every
/// property, environment, file, and process access a build makes. All
/// methods default to no-ops so consumers only implement the accesses they
/// care about.
pub trait AccessListener: Send + Sync {
    /// A property was read. `value` is the value observed by the underlying
    /// read at that moment, `None` when the property is absent.
    fn property_queried(&self, _key: &str, _value: Option<&str>, _consumer: &str) {}

    /// A property was added or updated to `value`.
    fn property_changed(&self, _key: &str, _value: &PropValue, _consumer: &str) {}

    /// A property was removed. The property may not have been present.
    fn property_removed(&self, _key: &str, _consumer: &str) {}

    /// All properties were removed at once.
    fn properties_cleared(&self, _consumer: &str) {}

    /// An environment variable was read.
    fn env_queried(&self, _key: &str, _value: Option<&str>, _consumer: &str) {}

    /// An external process is being started. `command_line` is the
    /// arguments joined by single spaces, for reporting only: nothing is
    /// escaped, so the string is not suitable for actually invoking the
    /// command.
    fn process_started(&self, _command_line: &str, _consumer: &str) {}

    /// A file's contents were opened for reading. The path is absolute.
    fn file_opened(&self, _path: &Path, _consumer: &str) {}

    /// A file was observed as a build input wholesale. The path is absolute.
    fn file_observed(&self, _path: &Path, _consumer: &str) {}

    /// A file system entry was probed for existence or type. The path is
    /// absolute.
    fn fs_entry_observed(&self, _path: &Path, _consumer: &str) {}

    /// A directory's content listing was observed. The path is absolute.
    fn directory_listed(&self, _path: &Path, _consumer: &str) {}
}

/// Discards every notification. Installed whenever no real listener is.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl AccessListener for NoopListener {}

/// One tracked access, in a form consumers can record or persist.
///
/// Mirrors the [`AccessListener`] capability set one-to-one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AccessEvent {
    PropertyQueried {
        key: String,
        value: Option<String>,
        consumer: String,
    },
    PropertyChanged {
        key: String,
        value: PropValue,
        consumer: String,
    },
    PropertyRemoved {
        key: String,
        consumer: String,
    },
    PropertiesCleared {
        consumer: String,
    },
    EnvQueried {
        key: String,
        value: Option<String>,
        consumer: String,
    },
    ProcessStarted {
        command_line: String,
        consumer: String,
    },
    FileOpened {
        path: PathBuf,
        consumer: String,
    },
    FileObserved {
        path: PathBuf,
        consumer: String,
    },
    FsEntryObserved {
        path: PathBuf,
        consumer: String,
    },
    DirectoryListed {
        path: PathBuf,
        consumer: String,
    },
}

static ACTIVE: Lazy<RwLock<Arc<dyn AccessListener>>> =
    Lazy::new(|| RwLock::new(Arc::new(NoopListener)));

/// Install `listener` as the process-wide active listener, replacing any
/// previous one. Takes effect for the very next tracked call.
pub fn set_listener(listener: Arc<dyn AccessListener>) {
    debug!("installing access listener");
    *ACTIVE.write() = listener;
}

/// Reset the slot to the no-op listener.
pub fn discard_listener() {
    debug!("discarding access listener");
    *ACTIVE.write() = Arc::new(NoopListener);
}

/// The currently active listener.
///
/// Callers that emit several notifications for one logical operation must
/// call this once and reuse the clone, so a concurrent replacement cannot
/// split the operation across two listeners.
pub fn current_listener() -> Arc<dyn AccessListener> {
    ACTIVE.read().clone()
}
