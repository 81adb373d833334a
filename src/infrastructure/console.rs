//! # Console Chat
//!
//! A local front-end: every stdin line is routed as a chat message from one fixed user,
//! and the bot's replies are printed to stdout.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::router::CommandRouter;
use crate::domain::traits::ChatProvider;
use crate::domain::types::UserIdentity;

#[derive(Clone, Default)]
pub struct ConsoleChat;

#[async_trait]
impl ChatProvider for ConsoleChat {
    async fn send_message(&self, content: &str) -> Result<(), String> {
        tracing::info!("Bot sending message to console: {}", content);
        println!("{}", content);
        Ok(())
    }

    fn channel(&self) -> String {
        "console".to_string()
    }
}

/// Reads stdin until EOF.
pub async fn run(router: Arc<CommandRouter>, identity: UserIdentity) -> Result<()> {
    let chat: Arc<dyn ChatProvider> = Arc::new(ConsoleChat);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!("Console ready, chatting as {}", identity.display_name);
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = router.route(chat.clone(), &line, &identity).await {
            tracing::error!("Failed to route message: {}", e);
        }
    }
    tracing::info!("Console closed");
    Ok(())
}
