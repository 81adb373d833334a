//! # Command Handlers
//!
//! Contains the handler functions for each chat command (e.g., `tip`, `raffle`, `leaderboard`).
//! Every feature module contributes its handlers through `contribute_handlers`;
//! `build_registry` merges them in a fixed order: general, tips, quotes, then the
//! raffle and leaderboard extensions. A later module wins when two use the same name.

mod entries;
pub mod general;
pub mod leaderboard;
pub mod quotes;
pub mod raffle;
pub mod tips;

use crate::application::registry::{CommandRegistry, RegistryBuilder};

pub fn build_registry() -> CommandRegistry {
    RegistryBuilder::new()
        .extend("general", general::contribute_handlers())
        .extend("tips", tips::contribute_handlers())
        .extend("quotes", quotes::contribute_handlers())
        .extend("raffle", raffle::contribute_handlers())
        .extend("leaderboard", leaderboard::contribute_handlers())
        .build()
}

/// Parses an entry id. Only plain decimal digits are accepted.
pub(crate) fn parse_id(arg: &str) -> Option<i64> {
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    arg.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("007"), Some(7));
        assert_eq!(parse_id("4a"), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("99999999999999999999999"), None);
    }

    #[test]
    fn test_registry_contains_all_modules() {
        let registry = build_registry();
        for name in [
            "say",
            "sfx",
            "followage",
            "tip",
            "addtip",
            "edittip",
            "deletetip",
            "quote",
            "addquote",
            "editquote",
            "deletequote",
            "raffle",
            "startraffle",
            "endraffle",
            "leaderboard",
            "rank",
            "ignore",
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(registry.len(), 17);
    }
}
