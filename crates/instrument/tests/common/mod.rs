#![allow(dead_code)]

use envtrace_instrument::{set_listener, AccessEvent, AccessListener, PropValue};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::{Arc, Once};

/// Records every notification for later assertion.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<AccessEvent>>,
}

impl RecordingListener {
    /// Create a recorder and install it as the active listener.
    pub fn install() -> Arc<Self> {
        init_logging();
        let listener = Arc::new(Self::default());
        set_listener(listener.clone());
        listener
    }

    pub fn events(&self) -> Vec<AccessEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<AccessEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    fn push(&self, event: AccessEvent) {
        self.events.lock().push(event);
    }
}

impl AccessListener for RecordingListener {
    fn property_queried(&self, key: &str, value: Option<&str>, consumer: &str) {
        self.push(AccessEvent::PropertyQueried {
            key: key.to_string(),
            value: value.map(str::to_string),
            consumer: consumer.to_string(),
        });
    }

    fn property_changed(&self, key: &str, value: &PropValue, consumer: &str) {
        self.push(AccessEvent::PropertyChanged {
            key: key.to_string(),
            value: value.clone(),
            consumer: consumer.to_string(),
        });
    }

    fn property_removed(&self, key: &str, consumer: &str) {
        self.push(AccessEvent::PropertyRemoved {
            key: key.to_string(),
            consumer: consumer.to_string(),
        });
    }

    fn properties_cleared(&self, consumer: &str) {
        self.push(AccessEvent::PropertiesCleared {
            consumer: consumer.to_string(),
        });
    }

    fn env_queried(&self, key: &str, value: Option<&str>, consumer: &str) {
        self.push(AccessEvent::EnvQueried {
            key: key.to_string(),
            value: value.map(str::to_string),
            consumer: consumer.to_string(),
        });
    }

    fn process_started(&self, command_line: &str, consumer: &str) {
        self.push(AccessEvent::ProcessStarted {
            command_line: command_line.to_string(),
            consumer: consumer.to_string(),
        });
    }

    fn file_opened(&self, path: &Path, consumer: &str) {
        self.push(AccessEvent::FileOpened {
            path: path.to_path_buf(),
            consumer: consumer.to_string(),
        });
    }

    fn file_observed(&self, path: &Path, consumer: &str) {
        self.push(AccessEvent::FileObserved {
            path: path.to_path_buf(),
            consumer: consumer.to_string(),
        });
    }

    fn fs_entry_observed(&self, path: &Path, consumer: &str) {
        self.push(AccessEvent::FsEntryObserved {
            path: path.to_path_buf(),
            consumer: consumer.to_string(),
        });
    }

    fn directory_listed(&self, path: &Path, consumer: &str) {
        self.push(AccessEvent::DirectoryListed {
            path: path.to_path_buf(),
            consumer: consumer.to_string(),
        });
    }
}

/// A property or environment key no other test can collide with.
pub fn unique_key(prefix: &str) -> String {
    format!("{prefix}.{}", uuid::Uuid::new_v4())
}

/// Opt-in log output for debugging test failures (`RUST_LOG=debug`).
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}
