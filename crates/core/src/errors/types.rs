//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for envtrace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for envtrace operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Environment variable related errors
    Environment { variable: String, message: String },

    /// Command execution errors
    CommandExecution {
        command: String,
        args: Vec<String>,
        message: String,
        exit_code: Option<i32>,
    },

    /// Configuration errors
    Configuration { message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Unsupported operation errors
    Unsupported { feature: String, message: String },
}
