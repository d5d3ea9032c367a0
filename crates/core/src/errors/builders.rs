//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create an environment variable error
    #[must_use]
    pub fn environment(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Environment {
            variable: variable.into(),
            message: message.into(),
        }
    }

    /// Create a command execution error
    #[must_use]
    pub fn command_execution(
        command: impl Into<String>,
        args: Vec<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Error::CommandExecution {
            command: command.into(),
            args,
            message: message.into(),
            exit_code,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create an unsupported feature error
    #[must_use]
    pub fn unsupported(feature: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Unsupported {
            feature: feature.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_populate_variants() {
        let err = Error::environment("HOME", "not set");
        assert!(matches!(err, Error::Environment { .. }));
        assert_eq!(err.to_string(), "environment variable 'HOME' error: not set");

        let err = Error::command_execution("git", vec!["status".to_string()], "spawn failed", None);
        assert_eq!(err.to_string(), "command 'git status' failed: spawn failed");

        let err = Error::unsupported("encoding 'utf-7'", "no decoder available");
        assert!(err.to_string().contains("utf-7"));
    }
}
