//! Undecorated filesystem primitives wrapped by the interception layer.

use crate::call::{Encoding, EntryFilter};
use envtrace_core::{Error, Result};
use globset::Glob;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// List the entries of `path`, name-sorted for reproducibility, keeping
/// only those accepted by `filter`.
pub fn list_dir(path: &Path, filter: Option<&EntryFilter>) -> Result<Vec<PathBuf>> {
    let matcher = match filter {
        Some(EntryFilter::Pattern(pattern)) => Some(
            Glob::new(pattern)
                .map_err(|e| {
                    Error::configuration(format!("invalid entry filter pattern '{pattern}': {e}"))
                })?
                .compile_matcher(),
        ),
        _ => None,
    };

    let read = fs::read_dir(path).map_err(|e| Error::file_system(path, "read_dir", e))?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| Error::file_system(path, "read_dir", e))?;
        let entry_path = entry.path();
        let keep = match filter {
            None => true,
            Some(EntryFilter::Pattern(_)) => match &matcher {
                Some(m) => m.is_match(Path::new(&entry.file_name())),
                None => true,
            },
            Some(EntryFilter::Predicate(accept)) => accept(&entry_path),
        };
        if keep {
            entries.push(entry_path);
        }
    }
    entries.sort();
    Ok(entries)
}

/// Read a whole file as text. With no encoding the contents must be UTF-8.
///
/// Encodings are resolved by name. An unknown name is a fatal
/// [`Error::Unsupported`]: the requested decoder is a foundational
/// capability and cannot be degraded gracefully.
pub fn read_with_encoding(path: &Path, encoding: Option<&Encoding>) -> Result<String> {
    let Some(encoding) = encoding else {
        return fs::read_to_string(path).map_err(|e| Error::file_system(path, "read", e));
    };

    let name = encoding.normalized();
    match name.as_str() {
        "utf-8" | "utf8" => fs::read_to_string(path).map_err(|e| Error::file_system(path, "read", e)),
        "us-ascii" | "ascii" => {
            let bytes = fs::read(path).map_err(|e| Error::file_system(path, "read", e))?;
            if let Some(byte) = bytes.iter().find(|b| !b.is_ascii()) {
                return Err(Error::file_system(
                    path,
                    "read",
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("byte 0x{byte:02x} is outside US-ASCII"),
                    ),
                ));
            }
            // All bytes are ASCII, so this cannot fail.
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        "iso-8859-1" | "latin-1" | "latin1" => {
            let bytes = fs::read(path).map_err(|e| Error::file_system(path, "read", e))?;
            Ok(bytes.iter().map(|&b| b as char).collect())
        }
        _ => Err(Error::unsupported(
            format!("encoding '{}'", encoding.name()),
            "no decoder is linked for this charset",
        )),
    }
}

/// Open a streaming read handle for `path`.
pub fn open_stream(path: &Path) -> Result<fs::File> {
    fs::File::open(path).map_err(|e| Error::file_system(path, "open", e))
}
