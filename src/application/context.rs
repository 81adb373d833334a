//! # Application Context
//!
//! The shared services handed to every command handler. Built per incoming message
//! so that replies go to the chat the message came from.

use std::sync::Arc;

use crate::application::state::SettingsStore;
use crate::domain::config::AppConfig;
use crate::domain::traits::{AlertSink, ChannelApi, ChatProvider, Store};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub chat: Arc<dyn ChatProvider>,
    pub store: Arc<dyn Store>,
    pub api: Arc<dyn ChannelApi>,
    pub alerts: Arc<dyn AlertSink>,
    pub settings: Arc<SettingsStore>,
}

impl AppContext {
    /// Emit a line to chat. Delivery failures are logged, never returned.
    pub async fn say(&self, text: &str) {
        if let Err(e) = self.chat.send_message(text).await {
            tracing::warn!("Failed to send message to {}: {}", self.chat.channel(), e);
        }
    }

    /// Send an overlay alert. Delivery failures are logged, never returned.
    pub async fn alert(&self, kind: &str, payload: serde_json::Value) {
        if let Err(e) = self.alerts.send_alert(kind, payload).await {
            tracing::warn!("Failed to send {} alert: {:#}", kind, e);
        }
    }
}
