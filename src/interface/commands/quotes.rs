//! # Quote Commands
//!
//! Handles `quote`, `addquote`, `editquote` and `deletequote`.
//! New quotes are only accepted while the channel is live and are tagged with the current game.

use std::sync::Arc;

use crate::application::context::AppContext;
use crate::application::registry::{HandlerSet, handler};
use crate::domain::error::CommandError;
use crate::domain::types::EntryKind;
use crate::interface::commands::entries;
use crate::strings::messages::{self, ANONYMOUS};

const MIN_LEN: usize = 2;

pub fn contribute_handlers() -> HandlerSet {
    vec![
        ("quote", handler(quote)),
        ("addquote", handler(addquote)),
        ("editquote", handler(editquote)),
        ("deletequote", handler(deletequote)),
    ]
}

async fn quote(ctx: Arc<AppContext>, user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    entries::show(&ctx, EntryKind::Quote, user.as_deref(), &args).await;
    Ok(())
}

async fn addquote(ctx: Arc<AppContext>, user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    let message = args.join(" ").trim().to_string();
    let user = user.as_deref();

    let live = ctx.api.is_live().await.unwrap_or_else(|e| {
        tracing::warn!("quote: error getting stream status: {:#}", e);
        false
    });
    if !live {
        ctx.say(&messages::quote_requires_live(user.unwrap_or(ANONYMOUS)))
            .await;
        return Ok(());
    }

    if !entries::check_length(&ctx, EntryKind::Quote, user, &message, MIN_LEN, None).await {
        return Ok(());
    }

    let game = match ctx.api.current_game().await {
        Ok(game) => game,
        Err(e) => {
            tracing::warn!("quote: error getting game info: {:#}", e);
            None
        }
    };

    entries::create(&ctx, EntryKind::Quote, user, game.as_deref(), &message).await;
    Ok(())
}

async fn editquote(ctx: Arc<AppContext>, _user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    entries::edit(&ctx, EntryKind::Quote, &args).await
}

async fn deletequote(ctx: Arc<AppContext>, _user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    entries::delete(&ctx, EntryKind::Quote, &args).await
}
