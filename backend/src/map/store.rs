//! On-disk storage for rendered map documents.
//!
//! All access goes through a capability-scoped [`cap_std::fs::Dir`] handle so
//! a requested filename can never escape the maps directory, and names are
//! additionally restricted to plain file names before any filesystem call.

use std::io;
use std::path::PathBuf;

use cap_std::{ambient_authority, fs::Dir};

/// Fixed filename the list view rewrites on every request.
///
/// Concurrent list views race on this file; last writer wins.
pub const MAP_DOCUMENT_FILENAME: &str = "carte.html";

/// Failures raised by the map store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapStoreError {
    /// The requested name is not a plain file name.
    #[error("invalid map document name: {name:?}")]
    InvalidName { name: String },
    /// No document with the requested name exists.
    #[error("map document not found: {name:?}")]
    NotFound { name: String },
    /// Underlying filesystem failure.
    #[error("map store I/O failed: {message}")]
    Io { message: String },
}

impl MapStoreError {
    fn io(error: &io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}

/// Reads and writes rendered map documents inside one directory.
#[derive(Debug, Clone)]
pub struct MapStore {
    root: PathBuf,
}

impl MapStore {
    /// Create a store rooted at `root`; the directory is created on first
    /// write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `contents` under `name`, replacing any previous document.
    pub fn write_document(&self, name: &str, contents: &str) -> Result<(), MapStoreError> {
        validate_name(name)?;
        Dir::create_ambient_dir_all(&self.root, ambient_authority())
            .map_err(|error| MapStoreError::io(&error))?;
        let dir = self.open_root(name)?;
        dir.write(name, contents.as_bytes())
            .map_err(|error| MapStoreError::io(&error))
    }

    /// Read the document stored under `name`.
    pub fn read_document(&self, name: &str) -> Result<String, MapStoreError> {
        validate_name(name)?;
        let dir = self.open_root(name)?;
        dir.read_to_string(name).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                MapStoreError::NotFound {
                    name: name.to_owned(),
                }
            } else {
                MapStoreError::io(&error)
            }
        })
    }

    fn open_root(&self, name: &str) -> Result<Dir, MapStoreError> {
        Dir::open_ambient_dir(&self.root, ambient_authority()).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                // An unwritten maps directory means no document exists yet.
                MapStoreError::NotFound {
                    name: name.to_owned(),
                }
            } else {
                MapStoreError::io(&error)
            }
        })
    }
}

fn validate_name(name: &str) -> Result<(), MapStoreError> {
    let plain = !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\');
    if plain {
        Ok(())
    } else {
        Err(MapStoreError::InvalidName {
            name: name.to_owned(),
        })
    }
}
