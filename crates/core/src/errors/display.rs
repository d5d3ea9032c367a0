//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Environment { variable, message } => {
                write!(f, "environment variable '{variable}' error: {message}")
            }
            Error::CommandExecution {
                command,
                args,
                message,
                exit_code,
            } => {
                let args_str = args.join(" ");
                match exit_code {
                    Some(code) => {
                        if args_str.is_empty() {
                            write!(
                                f,
                                "command '{command}' failed with exit code {code}: {message}"
                            )
                        } else {
                            write!(f, "command '{command} {args_str}' failed with exit code {code}: {message}")
                        }
                    }
                    None => {
                        if args_str.is_empty() {
                            write!(f, "command '{command}' failed: {message}")
                        } else {
                            write!(f, "command '{command} {args_str}' failed: {message}")
                        }
                    }
                }
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Unsupported { feature, message } => {
                write!(f, "unsupported feature '{feature}': {message}")
            }
        }
    }
}
