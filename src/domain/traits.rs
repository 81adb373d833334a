//! # Domain Traits
//!
//! Abstract interfaces for the collaborators the command engine calls into
//! (chat output, persistence, streaming platform, overlay alerts).
//! Allows for pluggable implementations in the Infrastructure layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::types::{Entry, EntryKind, Profile, UserIdentity, UserStats};

/// Abstract interface for a Chat Provider (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a line of text to the channel
    async fn send_message(&self, content: &str) -> Result<(), String>;

    /// Get the current channel or room ID
    fn channel(&self) -> String;
}

/// Persistence for tips, quotes and user statistics.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert an entry and return its assigned id.
    async fn create_entry(
        &self,
        kind: EntryKind,
        user: Option<&str>,
        game: Option<&str>,
        message: &str,
    ) -> Result<i64>;

    async fn entry_by_id(&self, kind: EntryKind, id: i64) -> Result<Option<Entry>>;

    async fn random_entry(&self, kind: EntryKind) -> Result<Option<Entry>>;

    /// Returns `false` when no entry has that id.
    async fn update_entry(&self, kind: EntryKind, id: i64, message: &str) -> Result<bool>;

    /// Returns `false` when no entry has that id.
    async fn delete_entry(&self, kind: EntryKind, id: i64) -> Result<bool>;

    /// Count one chat line for the user, creating the row on first sight.
    async fn record_chat(&self, user: &UserIdentity) -> Result<()>;

    /// Highest scoring users not excluded from stats.
    async fn list_ranked(&self, limit: usize) -> Result<Vec<UserStats>>;

    /// 1-based leaderboard position, `None` when unknown or ignored.
    async fn rank_of(&self, username: &str) -> Result<Option<usize>>;

    /// Returns `false` when the user is unknown.
    async fn set_ignore_stats(&self, username: &str, ignore: bool) -> Result<bool>;

    /// Idempotent.
    async fn enter_raffle(&self, username: &str) -> Result<()>;

    async fn raffle_entries(&self) -> Result<Vec<UserStats>>;

    async fn clear_raffle(&self) -> Result<()>;
}

/// Queries against the streaming platform.
#[async_trait]
pub trait ChannelApi: Send + Sync {
    async fn lookup_user(&self, name: &str) -> Result<Option<Profile>>;

    /// Category (game) currently set on the profile's channel.
    async fn channel_category(&self, profile: &Profile) -> Result<Option<String>>;

    /// When `profile` started following the channel with id `target_id`.
    async fn follow_since(
        &self,
        profile: &Profile,
        target_id: &str,
    ) -> Result<Option<DateTime<Utc>>>;

    /// Category of the bot's own channel.
    async fn current_game(&self) -> Result<Option<String>>;

    async fn is_live(&self) -> Result<bool>;

    /// Platform id of the bot's own channel.
    async fn broadcaster_id(&self) -> Result<String>;
}

/// Structured events for the stream overlay.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send_alert(&self, kind: &str, payload: serde_json::Value) -> Result<()>;
}
