//! # Raffle Commands
//!
//! Handles `raffle`, `startraffle` and `endraffle`.
//!
//! The raffle gate lives in `Settings::raffle_active`. Every handler holds the
//! settings lock from the gate check until the new state is persisted, so
//! concurrent start/enter/end calls are serialized. The lock is released before
//! anything is sent to chat or the overlay.

use rand::seq::SliceRandom;
use serde_json::json;
use std::sync::Arc;

use crate::application::context::AppContext;
use crate::application::registry::{HandlerSet, handler};
use crate::application::state::Settings;
use crate::domain::error::CommandError;

const WINNER_TOKEN: &str = "${winner}";

pub fn contribute_handlers() -> HandlerSet {
    vec![
        ("raffle", handler(raffle)),
        ("startraffle", handler(startraffle)),
        ("endraffle", handler(endraffle)),
    ]
}

/// Enters the invoking user and echoes the arguments.
async fn raffle(ctx: Arc<AppContext>, user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    let settings = ctx.settings.lock().await;
    if !settings.raffle_active {
        return Err(CommandError::RaffleNotActive);
    }

    let Some(user) = user else {
        tracing::debug!("Ignoring anonymous raffle entry");
        return Ok(());
    };

    if let Err(e) = ctx.store.enter_raffle(&user).await {
        tracing::warn!("Error saving raffle data: {:#}", e);
        return Ok(());
    }
    drop(settings);

    ctx.say(&args.join(" ")).await;
    Ok(())
}

/// Clears previous entries and opens the gate.
async fn startraffle(ctx: Arc<AppContext>, _user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    let mut settings = ctx.settings.lock().await;
    if settings.raffle_active {
        return Err(CommandError::RaffleAlreadyActive);
    }

    if let Err(e) = ctx.store.clear_raffle().await {
        tracing::warn!("Error deleting raffle data: {:#}", e);
        return Ok(());
    }

    if !set_gate(&ctx, &mut settings, true) {
        return Ok(());
    }
    drop(settings);

    ctx.say(&args.join(" ")).await;
    Ok(())
}

/// Draws a winner, clears the pool and closes the gate.
///
/// The first `${winner}` in the arguments is replaced by the winner's name.
async fn endraffle(ctx: Arc<AppContext>, _user: Option<String>, args: Vec<String>) -> Result<(), CommandError> {
    let mut settings = ctx.settings.lock().await;
    if !settings.raffle_active {
        return Err(CommandError::RaffleNotActive);
    }

    let entries = match ctx.store.raffle_entries().await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Error retrieving raffle data: {:#}", e);
            return Ok(());
        }
    };
    let winner = entries
        .choose(&mut rand::thread_rng())
        .map(|u| u.display_name.clone());

    if let Err(e) = ctx.store.clear_raffle().await {
        tracing::warn!("Error deleting raffle data: {:#}", e);
        return Ok(());
    }

    if !set_gate(&ctx, &mut settings, false) {
        return Ok(());
    }
    drop(settings);

    let Some(winner) = winner else {
        tracing::info!("Raffle ended without entries");
        return Ok(());
    };

    tracing::info!("Raffle winner: {}", winner);
    ctx.alert("rafflewinner", json!({ "user": winner })).await;
    ctx.say(&args.join(" ").replacen(WINNER_TOKEN, &winner, 1))
        .await;
    Ok(())
}

/// Persists the new gate value and only then applies it.
fn set_gate(ctx: &AppContext, settings: &mut Settings, active: bool) -> bool {
    let mut next = settings.clone();
    next.raffle_active = active;
    if let Err(e) = ctx.settings.persist(&next) {
        tracing::warn!("Error saving settings: {:#}", e);
        return false;
    }
    *settings = next;
    true
}
