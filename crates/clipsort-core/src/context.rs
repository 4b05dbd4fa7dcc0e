//! Persisted sign-in state, injected wherever a bearer token is needed.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use crate::{Authority, CoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    authorities: Vec<Authority>,
}

/// Token and authorities of the signed-in reviewer.
///
/// Backed by `session.json` when constructed with [`SessionContext::load`];
/// [`SessionContext::in_memory`] keeps everything in process.
#[derive(Debug)]
pub struct SessionContext {
    path: Option<PathBuf>,
    inner: RwLock<Option<StoredSession>>,
}

impl SessionContext {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: RwLock::new(None),
        }
    }

    /// Platform path: `<config_dir>/clipsort/session.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("clipsort").join("session.json"))
    }

    /// Load the stored session at `path`. An unreadable file is discarded and
    /// the context starts signed out.
    pub fn load(path: PathBuf) -> Self {
        let stored = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<StoredSession>(&content) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "discarding unreadable session file");
                    let _ = std::fs::remove_file(&path);
                    None
                }
            },
            Err(_) => None,
        };
        Self {
            path: Some(path),
            inner: RwLock::new(stored),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    /// First authority with the `ROLE_` prefix stripped (`USER`, `ADMIN`).
    pub fn role(&self) -> Option<String> {
        self.read().as_ref().and_then(|s| {
            s.authorities.first().map(|a| {
                a.authority
                    .strip_prefix("ROLE_")
                    .unwrap_or(&a.authority)
                    .to_string()
            })
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn sign_in(&self, token: String, authorities: Vec<Authority>) -> Result<(), CoreError> {
        let stored = StoredSession { token, authorities };
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, serde_json::to_string_pretty(&stored)?)?;
        }
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Some(stored);
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), CoreError> {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = None;
        if let Some(path) = &self.path
            && path.exists()
        {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<StoredSession>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }
}
