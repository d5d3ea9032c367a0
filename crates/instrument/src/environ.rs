//! Read-only access to the process environment.
//!
//! The environment is never mutated through this layer; only queried
//! notifications are ever produced for it. Values that are not valid
//! unicode are treated as absent.

use std::env;

pub fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

pub fn vars() -> Vec<(String, String)> {
    env::vars().collect()
}
