//! Path normalization for tracked-access notifications.

use std::env;
use std::path::{Path, PathBuf};

/// Absolute form of `path` as reported to listeners.
///
/// Already-rooted paths pass through unchanged. Relative paths are resolved
/// against the process working directory captured at the moment of the
/// call, never a cached one. If the working directory cannot be determined
/// the relative path is reported as-is rather than failing the operation.
pub fn absolute_of(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_pass_through() {
        let p = Path::new("/work/a.txt");
        assert_eq!(absolute_of(p), PathBuf::from("/work/a.txt"));
    }

    #[test]
    #[serial_test::serial]
    fn relative_paths_resolve_against_cwd() {
        let cwd = env::current_dir().expect("cwd");
        assert_eq!(absolute_of(Path::new("a.txt")), cwd.join("a.txt"));
    }
}
