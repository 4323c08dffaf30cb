// Marker store: the single on-disk record of the active issue

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const MARKER_FILENAME: &str = "active-issue";

/// The persisted record of the issue currently being time-tracked.
///
/// The activation instant is an explicit field written at creation, so
/// touching the file cannot corrupt elapsed-time accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub key: String,
    pub started_ts: i64,
}

/// Holds at most one active-session marker, system-wide.
///
/// Creation uses exclusive-create semantics, so two concurrent invocations
/// cannot both succeed in starting an issue.
pub struct MarkerStore {
    path: PathBuf,
}

impl MarkerStore {
    /// Default marker directory (~/.jita).
    pub fn default_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| Error::Storage {
            message: "unable to determine home directory".to_string(),
            source: None,
        })?;
        Ok(home.join(".jita"))
    }

    /// Open a store rooted at `dir`, creating the directory on first use
    /// with owner-only permissions.
    pub fn open(dir: impl Into<PathBuf>) -> Result<MarkerStore> {
        let dir = dir.into();

        if !dir.exists() {
            create_private_dir(&dir).map_err(|e| {
                Error::storage(format!("unable to create {}", dir.display()), e)
            })?;
        }

        Ok(MarkerStore {
            path: dir.join(MARKER_FILENAME),
        })
    }

    /// Read the current marker, if any.
    pub fn active(&self) -> Result<Option<ActiveSession>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::storage(
                    format!("unable to read {}", self.path.display()),
                    e,
                ))
            }
        };

        let session = serde_json::from_str(&contents).map_err(|e| Error::Storage {
            message: format!("corrupt marker {}: {}", self.path.display(), e),
            source: None,
        })?;

        Ok(Some(session))
    }

    /// Create the marker for `key`, activated now.
    pub fn set_active(&self, key: &str) -> Result<ActiveSession> {
        self.set_active_at(key, chrono::Utc::now().timestamp())
    }

    /// Create the marker for `key` with an explicit activation instant.
    ///
    /// Fails with `AlreadyActive` if a marker exists, including one created
    /// by a concurrent invocation between a caller's check and this call.
    pub fn set_active_at(&self, key: &str, started_ts: i64) -> Result<ActiveSession> {
        let session = ActiveSession {
            key: key.to_string(),
            started_ts,
        };
        let record = serde_json::to_string(&session).map_err(|e| Error::Storage {
            message: format!("unable to encode marker: {}", e),
            source: None,
        })?;

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let existing = self
                    .active()
                    .ok()
                    .flatten()
                    .map(|s| s.key)
                    .unwrap_or_else(|| "unknown".to_string());
                return Err(Error::AlreadyActive { key: existing });
            }
            Err(e) => {
                return Err(Error::storage(
                    format!("unable to create {}", self.path.display()),
                    e,
                ))
            }
        };

        file.write_all(record.as_bytes()).map_err(|e| {
            Error::storage(format!("unable to write {}", self.path.display()), e)
        })?;

        Ok(session)
    }

    /// Remove the marker. A missing marker is an error; callers check
    /// `active()` first, so hitting this means something else removed it.
    pub fn clear_active(&self) -> Result<()> {
        fs::remove_file(&self.path).map_err(|e| {
            Error::storage(format!("unable to remove {}", self.path.display()), e)
        })
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::DirBuilder::new().recursive(true).create(dir)
}
