//! Key-value persistence for workspace and navigation state.
//!
//! The shared workspace round-trips through a store under the key
//! `"workspace"`; each window's navigation state uses `"workspace-nav"`.
//! The file-backed store writes one `<key>.json` per key under
//! `~/.config/webdock/state/`.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use thiserror::Error;

use super::nav::SessionNav;
use crate::workspace::WorkspaceState;

/// Store key for the shared, multi-window workspace state.
pub const WORKSPACE_KEY: &str = "workspace";
/// Store key for a window's private navigation state.
pub const SESSION_NAV_KEY: &str = "workspace-nav";

/// Errors produced by [`KvStore`] implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid key {0:?}")]
    InvalidKey(String),
}

/// Minimal key-value persistence boundary.
///
/// The engine never assumes more than get/set/remove over opaque strings,
/// so hosts can back it with files, browser storage, or anything else.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// File-backed store: one `<key>.json` per key under `dir`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the default state directory,
    /// `~/.config/webdock/state/`.
    pub fn default_location() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("webdock")
            .join("state");
        Self::new(dir)
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        // Keys are fixed short names; anything path-like is a caller bug.
        if key.is_empty() || key.contains(['/', '\\', '.']) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                key: key.to_string(),
                source,
            })?;
        }
        std::fs::write(&path, value).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        if path.exists() {
            std::fs::remove_file(&path).map_err(|source| StorageError::Io {
                key: key.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

/// In-memory store for tests and for per-window ephemeral nav state.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Persist the workspace under [`WORKSPACE_KEY`].
pub fn save_workspace(store: &dyn KvStore, ws: &WorkspaceState) -> Result<()> {
    let json = serde_json::to_string(ws).context("Failed to serialize workspace state")?;
    store
        .set(WORKSPACE_KEY, &json)
        .context("Failed to write workspace state")?;
    log::info!(
        "Saved workspace ({} spaces, {} groups)",
        ws.spaces.len(),
        ws.tab_groups.len()
    );
    Ok(())
}

/// Load and normalize the workspace.
///
/// Returns `None` when nothing usable is stored (missing, empty, or
/// corrupt JSON); the caller falls back to the default workspace.
pub fn load_workspace(store: &dyn KvStore) -> Option<WorkspaceState> {
    let json = match store.get(WORKSPACE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read workspace state: {}", e);
            return None;
        }
    };
    let mut ws: WorkspaceState = match serde_json::from_str(&json) {
        Ok(ws) => ws,
        Err(e) => {
            log::warn!("Stored workspace state is corrupt, ignoring: {}", e);
            return None;
        }
    };
    ws.normalize();
    log::info!(
        "Loaded workspace ({} spaces, {} groups)",
        ws.spaces.len(),
        ws.tab_groups.len()
    );
    Some(ws)
}

/// Persist a window's nav state under [`SESSION_NAV_KEY`].
pub fn save_nav(store: &dyn KvStore, nav: &SessionNav) -> Result<()> {
    let json = serde_json::to_string(nav).context("Failed to serialize session nav")?;
    store
        .set(SESSION_NAV_KEY, &json)
        .context("Failed to write session nav")?;
    Ok(())
}

/// Load a window's nav state, validated against the current workspace.
///
/// Anything unusable (missing, corrupt, or referencing deleted entities)
/// falls back to the workspace's default view.
pub fn load_nav(store: &dyn KvStore, ws: &WorkspaceState) -> SessionNav {
    let stored = match store.get(SESSION_NAV_KEY) {
        Ok(stored) => stored,
        Err(e) => {
            log::warn!("Failed to read session nav: {}", e);
            None
        }
    };
    if let Some(json) = stored {
        match serde_json::from_str::<SessionNav>(&json) {
            Ok(mut nav) => {
                nav.repair(ws);
                return nav;
            }
            Err(e) => {
                log::warn!("Stored session nav is corrupt, ignoring: {}", e);
            }
        }
    }
    SessionNav::for_workspace(ws)
}
