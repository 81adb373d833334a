//! # Bot Settings
//!
//! Persistent runtime flags (`Settings`) shared by all invocations.
//! Handlers that read-modify-write a flag hold the lock for the whole operation,
//! including the persistence call, so concurrent commands cannot interleave.
//! It handles serialization and deserialization to/from JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Gate for the raffle: entries are only accepted while it is set.
    #[serde(default)]
    pub raffle_active: bool,
}

pub struct SettingsStore {
    path: Option<PathBuf>,
    settings: Mutex<Settings>,
}

impl SettingsStore {
    /// Loads the settings from `path` or returns defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            path: Some(path),
            settings: Mutex::new(settings),
        }
    }

    /// Settings that are never written to disk.
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            path: None,
            settings: Mutex::new(settings),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, Settings> {
        self.settings.lock().await
    }

    /// Writes `settings` (normally the value behind a held guard) to disk.
    pub fn persist(&self, settings: &Settings) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}
