//! Shared implementation of the tip and quote commands, which only differ in
//! their record kind and reply wording.

use chrono::DateTime;

use crate::application::context::AppContext;
use crate::domain::error::CommandError;
use crate::domain::types::{Entry, EntryKind};
use crate::interface::commands::parse_id;
use crate::strings::messages::{self, ANONYMOUS};

/// Shows the entry named by the first argument, or a random one.
pub(super) async fn show(ctx: &AppContext, kind: EntryKind, user: Option<&str>, args: &[String]) {
    let lookup = match args.first().and_then(|a| parse_id(a)) {
        Some(id) => ctx.store.entry_by_id(kind, id).await,
        None => ctx.store.random_entry(kind).await,
    };

    match lookup {
        Ok(Some(entry)) => ctx.say(&format_entry(kind, &entry)).await,
        Ok(None) => {
            ctx.say(&messages::out_of_entries(kind, user.unwrap_or(ANONYMOUS)))
                .await
        }
        Err(e) => tracing::warn!("Error getting {:?} data: {:#}", kind, e),
    }
}

fn format_entry(kind: EntryKind, entry: &Entry) -> String {
    match kind {
        EntryKind::Tip => messages::tip(entry),
        EntryKind::Quote => messages::quote(entry, &entry_date(entry.date)),
    }
}

/// `m/d/yyyy`
pub(super) fn entry_date(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|d| d.format("%-m/%-d/%Y").to_string())
        .unwrap_or_default()
}

/// Checks the message length, replying with the reason when it is out of bounds.
pub(super) async fn check_length(
    ctx: &AppContext,
    kind: EntryKind,
    user: Option<&str>,
    message: &str,
    min: usize,
    max: Option<usize>,
) -> bool {
    let len = message.chars().count();
    let user = user.unwrap_or(ANONYMOUS);
    if len < min {
        ctx.say(&messages::message_too_short(kind, user, min, len))
            .await;
        return false;
    }
    if let Some(max) = max
        && len > max
    {
        ctx.say(&messages::message_too_long(kind, user, max, len))
            .await;
        return false;
    }
    true
}

pub(super) async fn create(
    ctx: &AppContext,
    kind: EntryKind,
    user: Option<&str>,
    game: Option<&str>,
    message: &str,
) {
    match ctx.store.create_entry(kind, user, game, message).await {
        Ok(id) => ctx.say(&messages::entry_added(kind, id)).await,
        Err(e) => tracing::warn!("Error saving {:?} data: {:#}", kind, e),
    }
}

/// `<id> <message...>`
pub(super) async fn edit(ctx: &AppContext, kind: EntryKind, args: &[String]) -> Result<(), CommandError> {
    let id = match args {
        [first, _, ..] => parse_id(first),
        _ => None,
    }
    .ok_or(CommandError::InvalidArguments)?;

    let message = args[1..].join(" ").trim().to_string();
    match ctx.store.update_entry(kind, id, &message).await {
        Ok(true) => ctx.say(&messages::entry_edited(kind, id)).await,
        Ok(false) => tracing::info!("No {:?} #{} to edit", kind, id),
        Err(e) => tracing::warn!("Error saving {:?} data: {:#}", kind, e),
    }
    Ok(())
}

/// `<id>`
pub(super) async fn delete(ctx: &AppContext, kind: EntryKind, args: &[String]) -> Result<(), CommandError> {
    let id = args
        .first()
        .and_then(|a| parse_id(a))
        .ok_or(CommandError::InvalidArguments)?;

    match ctx.store.delete_entry(kind, id).await {
        Ok(true) => ctx.say(&messages::entry_deleted(kind, id)).await,
        Ok(false) => tracing::info!("No {:?} #{} to delete", kind, id),
        Err(e) => tracing::warn!("Error deleting {:?} data: {:#}", kind, e),
    }
    Ok(())
}
