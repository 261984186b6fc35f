use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::models::last_updated::LastUpdated;

const STATE_FILE: &str = "last_updated.json";

/// JSON file holding the per-webcam high-water marks between runs.
///
/// Loaded once at start, written in full once at the end of a run.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STATE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record. A missing or blank file is an empty record.
    pub fn load(&self) -> Result<LastUpdated, StateError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No state file yet, starting empty");
                return Ok(LastUpdated::new());
            }
            Err(source) => {
                return Err(StateError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(LastUpdated::new());
        }

        let record: LastUpdated =
            serde_json::from_str(&content).map_err(|source| StateError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), webcams = record.len(), "Loaded state");
        Ok(record)
    }

    /// Overwrite the state file with `record`.
    ///
    /// Writes a sibling temp file first and renames it into place, so a crash
    /// mid-write leaves the previous state intact.
    pub fn save(&self, record: &LastUpdated) -> Result<(), StateError> {
        let io_err = |source: io::Error| StateError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        let json =
            serde_json::to_string_pretty(record).map_err(|source| StateError::Serialize {
                path: self.path.clone(),
                source,
            })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        debug!(path = %self.path.display(), webcams = record.len(), "Saved state");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state file {path} is not a valid JSON object of timestamps: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize state for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
