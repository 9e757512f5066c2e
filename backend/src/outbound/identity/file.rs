//! JSON snapshot file holding an identity store between command runs.
//!
//! Reads and writes go through a `cap_std` handle on the file's parent
//! directory. Saves write a sibling temporary file and rename it over the
//! snapshot so a failed write never truncates existing state.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::IdentityStoreError;

use super::memory::InMemoryIdentityStore;
use super::snapshot::IdentitySnapshot;

/// Errors raised while loading or saving a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotFileError {
    /// The snapshot path has no file name component.
    #[error("snapshot path '{path}' does not name a file")]
    InvalidPath { path: PathBuf },
    /// Filesystem access failed.
    #[error("snapshot file operation failed ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not a valid snapshot document.
    #[error("snapshot file '{path}' is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The snapshot parsed but describes an inconsistent store.
    #[error("snapshot file '{path}' is inconsistent: {source}")]
    Integrity {
        path: PathBuf,
        #[source]
        source: IdentityStoreError,
    },
}

impl SnapshotFileError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Location of a JSON identity snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Point at a snapshot file. Nothing is read until [`Self::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parts(&self) -> Result<(&Path, &Path), SnapshotFileError> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| SnapshotFileError::InvalidPath {
                path: self.path.clone(),
            })?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Ok((parent, Path::new(file_name)))
    }

    /// Load the store. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotFileError`] when the file cannot be read, does not
    /// parse, or describes an inconsistent store.
    pub fn load(&self) -> Result<InMemoryIdentityStore, SnapshotFileError> {
        let (parent, file_name) = self.parts()?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(SnapshotFileError::io(parent))?;
        let contents = match directory.read_to_string(file_name) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "snapshot file absent; starting empty");
                return Ok(InMemoryIdentityStore::new());
            }
            Err(error) => return Err(SnapshotFileError::io(&self.path)(error)),
        };

        let snapshot: IdentitySnapshot =
            serde_json::from_str(&contents).map_err(|source| SnapshotFileError::Parse {
                path: self.path.clone(),
                source,
            })?;
        InMemoryIdentityStore::from_snapshot(snapshot).map_err(|source| {
            SnapshotFileError::Integrity {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Persist the store, replacing the file atomically.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotFileError`] when the store cannot be captured or
    /// the file cannot be written.
    pub fn save(&self, store: &InMemoryIdentityStore) -> Result<(), SnapshotFileError> {
        let snapshot = store
            .snapshot()
            .map_err(|source| SnapshotFileError::Integrity {
                path: self.path.clone(),
                source,
            })?;
        let mut rendered =
            serde_json::to_string_pretty(&snapshot).map_err(|source| SnapshotFileError::Parse {
                path: self.path.clone(),
                source,
            })?;
        rendered.push('\n');

        let (parent, file_name) = self.parts()?;
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(SnapshotFileError::io(parent))?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(SnapshotFileError::io(parent))?;

        let staged = PathBuf::from(format!(".tmp-identity-{}.json", Uuid::new_v4().simple()));
        directory
            .write(&staged, rendered.as_bytes())
            .map_err(SnapshotFileError::io(&self.path))?;
        if let Err(error) = directory.rename(&staged, &directory, file_name) {
            let _ = directory.remove_file(&staged);
            return Err(SnapshotFileError::io(&self.path)(error));
        }

        debug!(
            path = %self.path.display(),
            roles = snapshot.roles.len(),
            users = snapshot.users.len(),
            memberships = snapshot.memberships.len(),
            "snapshot saved"
        );
        Ok(())
    }
}
