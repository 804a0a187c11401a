//! Persisted session.
//!
//! Only the auth token survives a restart; every entity cache is rebuilt
//! from the server.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::credentials::AuthToken;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to access session file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Session file '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    token: AuthToken,
}

/// File-backed token storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved token, if any.
    pub fn load(&self) -> Result<Option<AuthToken>, SessionError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let file: SessionFile =
            serde_json::from_str(&content).map_err(|e| SessionError::Corrupt {
                path: self.path.clone(),
                source: e,
            })?;

        Ok(Some(file.token).filter(|t| !t.is_empty()))
    }

    /// Write the token, creating parent directories as needed.
    pub fn save(&self, token: &AuthToken) -> Result<(), SessionError> {
        let io_err = |e| SessionError::Io {
            path: self.path.clone(),
            source: e,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let body = serde_json::to_string_pretty(&SessionFile {
            token: token.clone(),
        })
        .map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }

    /// Forget the saved token. Missing file is not an error.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}
