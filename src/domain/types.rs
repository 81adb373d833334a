//! # Domain Types
//!
//! Common data structures used by the template engine, the dispatcher and the command handlers.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A chat user as seen by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub username: String,
    pub display_name: String,
}

impl UserIdentity {
    pub fn new(username: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            display_name: display_name.into(),
        }
    }
}

/// Everything known about one command invocation before expansion.
/// Owned by the dispatch call that created it.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub identity: Option<UserIdentity>,
    pub raw_text: String,
    pub positional_args: Vec<String>,
}

impl InvocationContext {
    pub fn new(
        identity: Option<UserIdentity>,
        raw_text: impl Into<String>,
        positional_args: Vec<String>,
    ) -> Self {
        Self {
            identity,
            raw_text: raw_text.into(),
            positional_args,
        }
    }

    /// The plain username handed to handlers.
    pub fn username(&self) -> Option<String> {
        self.identity.as_ref().map(|u| u.username.clone())
    }
}

/// Which positional arguments a `${...}` reference selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    /// `${N}`
    Index(usize),
    /// `${N:}`
    From(usize),
    /// `${N:M}`, end exclusive
    Range(usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderKind {
    Positional(Slice),
    Named {
        function: String,
        parameter: Option<String>,
    },
}

/// A `${...}` span found in a template.
///
/// `sequence` is the placeholder's index among the placeholders of its own family,
/// counted left to right. Named values are matched back to their span through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub span: Range<usize>,
    pub sequence: usize,
}

impl Placeholder {
    /// The original matched text, e.g. `${game somebody}`.
    pub fn source<'a>(&self, text: &'a str) -> &'a str {
        &text[self.span.clone()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    pub sequence: usize,
    pub text: String,
}

/// Fully substituted and tokenized command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    pub command: String,
    pub args: Vec<String>,
}

/// Kinds of user-submitted entries kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Tip,
    Quote,
}

impl EntryKind {
    /// Capitalized label used in chat replies ("Tip #3 has been edited!").
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Tip => "Tip",
            EntryKind::Quote => "Quote",
        }
    }
}

/// A tip or quote row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    /// Creation time, milliseconds since the Unix epoch.
    pub date: i64,
    pub user: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    pub message: String,
}

/// Per-user chat statistics and raffle participation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub chats: u64,
    #[serde(default)]
    pub trivia: u64,
    #[serde(default)]
    pub ignore_stats: bool,
    #[serde(default)]
    pub raffle: bool,
}

impl UserStats {
    pub fn new(username: &str, display_name: &str) -> Self {
        Self {
            username: username.to_lowercase(),
            display_name: display_name.to_string(),
            chats: 0,
            trivia: 0,
            ignore_stats: false,
            raffle: false,
        }
    }

    /// Leaderboard score: a trivia win is worth ten chat lines.
    pub fn score(&self) -> u64 {
        self.chats + self.trivia * 10
    }
}

/// A user profile on the streaming platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub login: String,
    pub display_name: String,
}
