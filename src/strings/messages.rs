//! # Messages
//!
//! Contains constant strings and format functions for user-facing chat replies.

use crate::domain::types::{Entry, EntryKind};

pub const AUTH_DENIED: &str = "🚫 Authorization Denied.";

/// Name used in replies when the invoking user is unknown.
pub const ANONYMOUS: &str = "user";

pub fn tip(entry: &Entry) -> String {
    format!("TIP #{}: {}", entry.id, entry.message)
}

pub fn quote(entry: &Entry, date: &str) -> String {
    let message = if entry.message.starts_with('"') {
        entry.message.clone()
    } else {
        format!("\"{}\"", entry.message)
    };
    match entry.game.as_deref().filter(|g| !g.is_empty()) {
        Some(game) => format!("Quote #{}: {message} [{game}] [{date}]", entry.id),
        None => format!("Quote #{}: {message} [{date}]", entry.id),
    }
}

pub fn out_of_entries(kind: EntryKind, user: &str) -> String {
    match kind {
        EntryKind::Tip => format!("Sorry, {user}, we're all out of tips!"),
        EntryKind::Quote => format!("Sorry, {user}, we're all out of quotes!"),
    }
}

pub fn message_too_short(kind: EntryKind, user: &str, min: usize, len: usize) -> String {
    format!(
        "{user} Your {} message is too short ({min} characters min, yours was {len})",
        kind.label().to_lowercase()
    )
}

pub fn message_too_long(kind: EntryKind, user: &str, max: usize, len: usize) -> String {
    format!(
        "{user} Your {} message is too long ({max} characters max, yours was {len})",
        kind.label().to_lowercase()
    )
}

pub fn entry_added(kind: EntryKind, id: i64) -> String {
    match kind {
        EntryKind::Tip => format!("Tip #{id} has been added to the list"),
        EntryKind::Quote => format!("Quote #{id} has been added!"),
    }
}

pub fn entry_edited(kind: EntryKind, id: i64) -> String {
    format!("{} #{id} has been edited!", kind.label())
}

pub fn entry_deleted(kind: EntryKind, id: i64) -> String {
    format!("{} #{id} has been deleted!", kind.label())
}

pub fn quote_requires_live(user: &str) -> String {
    format!("{user} You can only add a quote when the channel is live")
}

pub fn following_since(target: &str, since: &str) -> String {
    format!("{target} has been following since {since}")
}

pub fn not_following(target: &str) -> String {
    format!("{target} is not following")
}

pub fn leaderboard(count: usize, names: &[String]) -> String {
    format!("/me Top {count} users: {}.", names.join(", "))
}

pub fn rank_of_other(target: &str, rank: usize) -> String {
    format!("/me User {target} is ranked #{rank}.")
}

pub fn rank_of_self(target: &str, rank: usize) -> String {
    format!("@{target} You are ranked #{rank}.")
}

pub fn stats_ignore_set(user: Option<&str>, target: &str, ignored: bool) -> String {
    let mention = user.map(|u| format!("@{u} ")).unwrap_or_default();
    let status = if ignored { "" } else { "not " };
    format!("{mention}Set {target}'s stats status to {status}ignored.")
}
