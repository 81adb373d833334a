//! # Named Placeholder Resolution
//!
//! Resolves `${name param}` placeholders. Every occurrence gets its own task so a
//! slow platform lookup never holds up the others. The pool only returns once every
//! task has finished, timed out or failed; failures degrade to fallback text.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

use crate::domain::traits::ChannelApi;
use crate::domain::types::{Placeholder, PlaceholderKind, ResolvedValue, UserIdentity};

const UNKNOWN_GAME: &str = "unknown";

/// What a named placeholder asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedFunction {
    /// `${user}`
    User,
    /// `${channel name}`
    Channel(String),
    /// `${game}`
    Game,
    /// `${game name}`
    GameOf(String),
    /// Anything unrecognized is put back verbatim.
    Passthrough,
}

impl NamedFunction {
    /// Function names are matched case-sensitively.
    pub fn parse(function: &str, parameter: Option<&str>) -> Self {
        match (function, parameter) {
            ("user", _) => NamedFunction::User,
            ("channel", Some(p)) => NamedFunction::Channel(p.to_string()),
            ("game", None) => NamedFunction::Game,
            ("game", Some(p)) => NamedFunction::GameOf(p.to_string()),
            _ => NamedFunction::Passthrough,
        }
    }

    /// Text used when resolution fails or times out.
    fn fallback(&self, original: &str) -> String {
        match self {
            NamedFunction::Game | NamedFunction::GameOf(_) => UNKNOWN_GAME.to_string(),
            _ => original.to_string(),
        }
    }
}

pub struct NamedResolver {
    api: Arc<dyn ChannelApi>,
    timeout: Duration,
}

impl NamedResolver {
    pub fn new(api: Arc<dyn ChannelApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// Resolves every named placeholder of `text` concurrently.
    ///
    /// The returned values are in completion order; callers match them back to
    /// spans through `ResolvedValue::sequence`. Exactly one value is returned per
    /// named placeholder.
    pub async fn resolve_all(
        &self,
        text: &str,
        placeholders: &[Placeholder],
        identity: Option<&UserIdentity>,
    ) -> Vec<ResolvedValue> {
        let mut tasks = JoinSet::new();
        let mut fallbacks: Vec<(usize, String)> = Vec::with_capacity(placeholders.len());

        for placeholder in placeholders {
            let PlaceholderKind::Named {
                function,
                parameter,
            } = &placeholder.kind
            else {
                continue;
            };

            let original = placeholder.source(text).to_string();
            let function = NamedFunction::parse(function, parameter.as_deref());
            let fallback = function.fallback(&original);
            fallbacks.push((placeholder.sequence, fallback.clone()));

            let api = self.api.clone();
            let display_name = identity.map(|u| u.display_name.clone());
            let timeout = self.timeout;
            let sequence = placeholder.sequence;

            tasks.spawn(async move {
                let lookup = resolve(api, &function, &original, display_name);
                let text = match tokio::time::timeout(timeout, lookup).await {
                    Ok(Ok(text)) => text,
                    Ok(Err(e)) => {
                        tracing::warn!("Failed to resolve {}: {:#}", original, e);
                        fallback
                    }
                    Err(_) => {
                        tracing::warn!("Timed out resolving {} after {:?}", original, timeout);
                        fallback
                    }
                };
                ResolvedValue { sequence, text }
            });
        }

        let mut values = Vec::with_capacity(placeholders.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(value) => values.push(value),
                Err(e) => tracing::error!("Placeholder task failed: {}", e),
            }
        }

        // A task that panicked leaves its slot empty; fill it with the fallback.
        for (sequence, fallback) in fallbacks {
            if !values.iter().any(|v| v.sequence == sequence) {
                values.push(ResolvedValue {
                    sequence,
                    text: fallback,
                });
            }
        }

        values
    }
}

async fn resolve(
    api: Arc<dyn ChannelApi>,
    function: &NamedFunction,
    original: &str,
    display_name: Option<String>,
) -> Result<String> {
    match function {
        NamedFunction::User => Ok(display_name.unwrap_or_else(|| "user".to_string())),
        NamedFunction::Channel(name) => Ok(name.to_lowercase()),
        NamedFunction::Game => Ok(api
            .current_game()
            .await?
            .unwrap_or_else(|| UNKNOWN_GAME.to_string())),
        NamedFunction::GameOf(name) => Ok(game_of(api.as_ref(), name)
            .await?
            .unwrap_or_else(|| UNKNOWN_GAME.to_string())),
        NamedFunction::Passthrough => Ok(original.to_string()),
    }
}

async fn game_of(api: &dyn ChannelApi, name: &str) -> Result<Option<String>> {
    let Some(profile) = api.lookup_user(name).await? else {
        return Ok(None);
    };
    Ok(api
        .channel_category(&profile)
        .await?
        .filter(|game| !game.is_empty()))
}
