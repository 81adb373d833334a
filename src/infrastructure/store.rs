//! # JSON Store
//!
//! Implements the `Store` trait on top of a single JSON document.
//! The whole document is kept in memory and rewritten after every change.
//! A change is made on a copy and only becomes visible once it has been written.
//! Without a path (tests, console sessions) nothing touches the disk.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::domain::traits::Store;
use crate::domain::types::{Entry, EntryKind, UserIdentity, UserStats};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct EntryTable {
    /// Highest id handed out so far. Ids are never reused.
    #[serde(default)]
    last_id: i64,
    #[serde(default)]
    rows: Vec<Entry>,
}

impl EntryTable {
    fn get(&self, id: i64) -> Option<&Entry> {
        self.rows.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: i64) -> Option<&mut Entry> {
        self.rows.iter_mut().find(|e| e.id == id)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    tips: EntryTable,
    #[serde(default)]
    quotes: EntryTable,
    /// Keyed by lowercase username.
    #[serde(default)]
    users: BTreeMap<String, UserStats>,
}

impl StoreData {
    fn table(&self, kind: EntryKind) -> &EntryTable {
        match kind {
            EntryKind::Tip => &self.tips,
            EntryKind::Quote => &self.quotes,
        }
    }

    fn table_mut(&mut self, kind: EntryKind) -> &mut EntryTable {
        match kind {
            EntryKind::Tip => &mut self.tips,
            EntryKind::Quote => &mut self.quotes,
        }
    }

    fn user_mut(&mut self, username: &str, display_name: &str) -> &mut UserStats {
        let key = username.to_lowercase();
        self.users
            .entry(key)
            .or_insert_with(|| UserStats::new(username, display_name))
    }

    fn ranked(&self) -> Vec<&UserStats> {
        let mut users: Vec<&UserStats> = self.users.values().filter(|u| !u.ignore_stats).collect();
        users.sort_by(|a, b| b.score().cmp(&a.score()).then_with(|| a.username.cmp(&b.username)));
        users
    }
}

pub struct JsonStore {
    path: Option<PathBuf>,
    data: Mutex<StoreData>,
}

impl JsonStore {
    /// Opens the store at `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            StoreData::default()
        };
        tracing::info!("Opened store at {}", path.display());
        Ok(Self {
            path: Some(path),
            data: Mutex::new(data),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(StoreData::default()),
        }
    }

    fn save(&self, data: &StoreData) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(data)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Writes `next` and, on success, makes it the current document.
    fn commit(&self, data: &mut StoreData, next: StoreData) -> Result<()> {
        self.save(&next)?;
        *data = next;
        Ok(())
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn create_entry(
        &self,
        kind: EntryKind,
        user: Option<&str>,
        game: Option<&str>,
        message: &str,
    ) -> Result<i64> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let table = next.table_mut(kind);
        let id = table.last_id + 1;
        table.last_id = id;
        table.rows.push(Entry {
            id,
            date: chrono::Utc::now().timestamp_millis(),
            user: user.map(str::to_string),
            game: game.filter(|g| !g.is_empty()).map(str::to_string),
            message: message.to_string(),
        });
        self.commit(&mut data, next)?;
        Ok(id)
    }

    async fn entry_by_id(&self, kind: EntryKind, id: i64) -> Result<Option<Entry>> {
        let data = self.data.lock().await;
        Ok(data.table(kind).get(id).cloned())
    }

    async fn random_entry(&self, kind: EntryKind) -> Result<Option<Entry>> {
        let data = self.data.lock().await;
        Ok(data.table(kind).rows.choose(&mut rand::thread_rng()).cloned())
    }

    async fn update_entry(&self, kind: EntryKind, id: i64, message: &str) -> Result<bool> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let Some(entry) = next.table_mut(kind).get_mut(id) else {
            return Ok(false);
        };
        entry.message = message.to_string();
        self.commit(&mut data, next)?;
        Ok(true)
    }

    async fn delete_entry(&self, kind: EntryKind, id: i64) -> Result<bool> {
        let mut data = self.data.lock().await;
        if data.table(kind).get(id).is_none() {
            return Ok(false);
        }
        let mut next = data.clone();
        next.table_mut(kind).rows.retain(|e| e.id != id);
        self.commit(&mut data, next)?;
        Ok(true)
    }

    async fn record_chat(&self, user: &UserIdentity) -> Result<()> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let stats = next.user_mut(&user.username, &user.display_name);
        stats.display_name = user.display_name.clone();
        stats.chats += 1;
        self.commit(&mut data, next)
    }

    async fn list_ranked(&self, limit: usize) -> Result<Vec<UserStats>> {
        let data = self.data.lock().await;
        Ok(data.ranked().into_iter().take(limit).cloned().collect())
    }

    async fn rank_of(&self, username: &str) -> Result<Option<usize>> {
        let data = self.data.lock().await;
        let Some(target) = data
            .users
            .get(&username.to_lowercase())
            .filter(|u| !u.ignore_stats)
        else {
            return Ok(None);
        };
        let score = target.score();
        // Users tied on score share the lower rank.
        let rank = data
            .users
            .values()
            .filter(|u| !u.ignore_stats && u.score() >= score)
            .count();
        Ok(Some(rank))
    }

    async fn set_ignore_stats(&self, username: &str, ignore: bool) -> Result<bool> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let Some(stats) = next.users.get_mut(&username.to_lowercase()) else {
            return Ok(false);
        };
        stats.ignore_stats = ignore;
        self.commit(&mut data, next)?;
        Ok(true)
    }

    async fn enter_raffle(&self, username: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        if data
            .users
            .get(&username.to_lowercase())
            .is_some_and(|u| u.raffle)
        {
            return Ok(());
        }
        let mut next = data.clone();
        next.user_mut(username, username).raffle = true;
        self.commit(&mut data, next)
    }

    async fn raffle_entries(&self) -> Result<Vec<UserStats>> {
        let data = self.data.lock().await;
        Ok(data.users.values().filter(|u| u.raffle).cloned().collect())
    }

    async fn clear_raffle(&self) -> Result<()> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        for stats in next.users.values_mut() {
            stats.raffle = false;
        }
        self.commit(&mut data, next)
    }
}
