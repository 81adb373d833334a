//! # General Commands
//!
//! Handles `say`, `sfx` and `followage`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

use crate::application::context::AppContext;
use crate::application::registry::{HandlerSet, handler};
use crate::domain::error::CommandError;
use crate::strings::messages;

pub fn contribute_handlers() -> HandlerSet {
    vec![
        ("say", handler(say)),
        ("sfx", handler(sfx)),
        ("followage", handler(followage)),
    ]
}

async fn say(ctx: Arc<AppContext>, _user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    ctx.say(&args.join(" ")).await;
    Ok(())
}

/// Plays a configured sound effect on the overlay.
async fn sfx(ctx: Arc<AppContext>, _user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    let name = args.first().ok_or(CommandError::SoundNotFound)?;
    let file = ctx.config.sfx.get(name).ok_or(CommandError::SoundNotFound)?;
    ctx.alert("sfx", json!({ "name": name, "file": file })).await;
    Ok(())
}

async fn followage(ctx: Arc<AppContext>, user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    let Some(target) = args.first().cloned().or(user) else {
        return Ok(());
    };

    match follow_date(&ctx, &target).await? {
        Some(since) => {
            let since = since.format("%Y-%m-%d").to_string();
            ctx.say(&messages::following_since(&target, &since)).await;
        }
        None => ctx.say(&messages::not_following(&target)).await,
    }
    Ok(())
}

async fn follow_date(ctx: &AppContext, target: &str) -> Result<Option<DateTime<Utc>>> {
    let Some(profile) = ctx.api.lookup_user(target).await? else {
        return Ok(None);
    };
    let broadcaster = ctx.api.broadcaster_id().await?;
    ctx.api.follow_since(&profile, &broadcaster).await
}
