//! # Tip Commands
//!
//! Handles `tip`, `addtip`, `edittip` and `deletetip`.

use std::sync::Arc;

use crate::application::context::AppContext;
use crate::application::registry::{HandlerSet, handler};
use crate::domain::error::CommandError;
use crate::domain::types::EntryKind;
use crate::interface::commands::entries;

const MIN_LEN: usize = 2;
const MAX_LEN: usize = 80;

pub fn contribute_handlers() -> HandlerSet {
    vec![
        ("tip", handler(tip)),
        ("addtip", handler(addtip)),
        ("edittip", handler(edittip)),
        ("deletetip", handler(deletetip)),
    ]
}

async fn tip(ctx: Arc<AppContext>, user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    entries::show(&ctx, EntryKind::Tip, user.as_deref(), &args).await;
    Ok(())
}

async fn addtip(ctx: Arc<AppContext>, user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    let message = args.join(" ");
    let user = user.as_deref();
    if entries::check_length(&ctx, EntryKind::Tip, user, &message, MIN_LEN, Some(MAX_LEN)).await {
        entries::create(&ctx, EntryKind::Tip, user, None, &message).await;
    }
    Ok(())
}

async fn edittip(ctx: Arc<AppContext>, _user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    entries::edit(&ctx, EntryKind::Tip, &args).await
}

async fn deletetip(ctx: Arc<AppContext>, _user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    entries::delete(&ctx, EntryKind::Tip, &args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::Store;
    use crate::testing::Harness;

    #[tokio::test]
    async fn test_addtip_too_short() {
        let harness = Harness::new();
        harness.run("addtip", Some("bob"), &["x"]).await.unwrap();

        let messages = harness.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("2 characters min"));
        assert!(messages[0].contains("yours was 1"));
        assert!(harness.store.random_entry(EntryKind::Tip).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_addtip_too_long() {
        let harness = Harness::new();
        let long = "a".repeat(81);
        harness.run("addtip", Some("bob"), &[long.as_str()]).await.unwrap();

        let messages = harness.messages();
        assert!(messages[0].contains("80 characters max"));
        assert!(messages[0].contains("yours was 81"));
        assert!(harness.store.random_entry(EntryKind::Tip).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_addtip_bounds_are_inclusive() {
        let harness = Harness::new();
        let max = "b".repeat(80);
        harness.run("addtip", Some("bob"), &["ok"]).await.unwrap();
        harness.run("addtip", Some("bob"), &[max.as_str()]).await.unwrap();
        assert_eq!(
            harness.messages(),
            vec![
                "Tip #1 has been added to the list",
                "Tip #2 has been added to the list",
            ]
        );
    }

    #[tokio::test]
    async fn test_tip_lookup() {
        let harness = Harness::new();
        harness.run("tip", Some("bob"), &[]).await.unwrap();
        harness
            .run("addtip", Some("bob"), &["stay", "hydrated"])
            .await
            .unwrap();
        harness.run("tip", Some("bob"), &["1"]).await.unwrap();
        harness.run("tip", Some("bob"), &[]).await.unwrap();
        harness.run("tip", None, &["9"]).await.unwrap();

        assert_eq!(
            harness.messages(),
            vec![
                "Sorry, bob, we're all out of tips!",
                "Tip #1 has been added to the list",
                "TIP #1: stay hydrated",
                "TIP #1: stay hydrated",
                "Sorry, user, we're all out of tips!",
            ]
        );
    }

    #[tokio::test]
    async fn test_edit_and_delete() {
        let harness = Harness::new();
        harness.run("addtip", Some("bob"), &["old", "text"]).await.unwrap();
        harness
            .run("edittip", Some("bob"), &["1", "new", "text"])
            .await
            .unwrap();
        harness.run("tip", None, &["1"]).await.unwrap();
        harness.run("deletetip", None, &["1"]).await.unwrap();

        assert_eq!(
            harness.messages()[1..],
            [
                "Tip #1 has been edited!",
                "TIP #1: new text",
                "Tip #1 has been deleted!",
            ]
        );
        assert!(harness.store.entry_by_id(EntryKind::Tip, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_ids() {
        let harness = Harness::new();
        assert_eq!(
            harness.run("edittip", None, &["one", "text"]).await,
            Err(CommandError::InvalidArguments)
        );
        assert_eq!(
            harness.run("edittip", None, &["1"]).await,
            Err(CommandError::InvalidArguments)
        );
        assert_eq!(
            harness.run("deletetip", None, &[]).await,
            Err(CommandError::InvalidArguments)
        );
        assert_eq!(
            harness.run("deletetip", None, &["#1"]).await,
            Err(CommandError::InvalidArguments)
        );
        assert!(harness.messages().is_empty());
    }
}
