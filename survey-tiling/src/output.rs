/// JSON file reading and atomic writing
use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads and parses a whole JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `value` as JSON, pretty (two-space indent) or compact.
/// The text goes to a sibling temp file first so a failure never leaves a
/// truncated destination behind.
pub fn write_json<T: Serialize>(value: &T, destination: &Path, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|source| Error::Json {
        path: destination.to_path_buf(),
        source,
    })?;

    let staging = staging_path(destination);
    fs::write(&staging, text)
        .and_then(|()| fs::rename(&staging, destination))
        .map_err(|source| {
            let _ = fs::remove_file(&staging);
            Error::Io {
                path: destination.to_path_buf(),
                source,
            }
        })
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    destination.with_file_name(name)
}
