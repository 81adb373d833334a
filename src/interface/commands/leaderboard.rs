//! # Leaderboard Commands
//!
//! Handles `leaderboard`, `rank` and `ignore`.

use std::sync::Arc;

use crate::application::context::AppContext;
use crate::application::registry::{HandlerSet, handler};
use crate::domain::error::CommandError;
use crate::strings::messages;

const DEFAULT_COUNT: usize = 5;
const MAX_COUNT: usize = 25;

pub fn contribute_handlers() -> HandlerSet {
    vec![
        ("leaderboard", handler(leaderboard)),
        ("rank", handler(rank)),
        ("ignore", handler(ignore)),
    ]
}

/// `[count]`, clamped to 5..=25
async fn leaderboard(ctx: Arc<AppContext>, _user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    let count = args
        .first()
        .and_then(|a| a.parse::<usize>().ok())
        .unwrap_or(DEFAULT_COUNT)
        .clamp(DEFAULT_COUNT, MAX_COUNT);

    match ctx.store.list_ranked(count).await {
        Ok(users) => {
            let names: Vec<String> = users.into_iter().map(|u| u.display_name).collect();
            ctx.say(&messages::leaderboard(count, &names)).await;
        }
        Err(e) => tracing::warn!("Error getting leaderboard: {:#}", e),
    }
    Ok(())
}

async fn rank(ctx: Arc<AppContext>, user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    let explicit = args.first().cloned();
    let Some(target) = explicit.clone().or(user) else {
        return Ok(());
    };

    let rank = match ctx.store.rank_of(&target).await {
        Ok(Some(rank)) => rank,
        Ok(None) => {
            tracing::info!("No rank for {}", target);
            return Ok(());
        }
        Err(e) => {
            tracing::warn!("Error getting rank: {:#}", e);
            return Ok(());
        }
    };

    let reply = if explicit.is_some() {
        messages::rank_of_other(&target, rank)
    } else {
        messages::rank_of_self(&target, rank)
    };
    ctx.say(&reply).await;
    Ok(())
}

/// `<username> <0|1>`
async fn ignore(ctx: Arc<AppContext>, user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    let [target, value, ..] = args.as_slice() else {
        return Err(CommandError::InvalidArguments);
    };
    let target = target.to_lowercase();
    let ignored = value != "0";

    match ctx.store.set_ignore_stats(&target, ignored).await {
        Ok(true) => {
            ctx.say(&messages::stats_ignore_set(user.as_deref(), &target, ignored))
                .await
        }
        Ok(false) => tracing::info!("Unknown user {}", target),
        Err(e) => tracing::warn!("Error saving user data: {:#}", e),
    }
    Ok(())
}
