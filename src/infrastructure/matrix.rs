//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the `matrix_sdk`.
//! `run` logs the bot in, joins rooms it is invited to, and hands every text message
//! from a room to the command router with a `MatrixService` bound to that room.

use anyhow::{Context, Result};
use async_trait::async_trait;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::{
        UserId,
        events::room::{
            member::{MembershipState, StrippedRoomMemberEvent},
            message::{MessageType, RoomMessageEventContent, SyncRoomMessageEvent},
        },
    },
};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::application::router::CommandRouter;
use crate::domain::config::MatrixConfig;
use crate::domain::traits::ChatProvider;
use crate::domain::types::UserIdentity;

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }

    /// Identity of a room member: the MXID localpart plus the room display name if set.
    async fn identity(&self, sender: &UserId) -> UserIdentity {
        let username = sender.localpart().to_lowercase();
        let display_name = match self.room.get_member_no_sync(sender).await {
            Ok(Some(member)) => member.display_name().map(str::to_string),
            _ => None,
        };
        let display_name = display_name.unwrap_or_else(|| sender.localpart().to_string());
        UserIdentity::new(username, display_name)
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn channel(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<(), String> {
        tracing::info!("Bot sending message to {}: {}", self.channel(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Logs in and processes room messages until the sync loop ends.
pub async fn run(config: &MatrixConfig, router: Arc<CommandRouter>) -> Result<()> {
    let client = Client::builder()
        .homeserver_url(&config.homeserver)
        .build()
        .await
        .context("Failed to build Matrix client")?;

    client
        .matrix_auth()
        .login_username(&config.username, &config.password)
        .send()
        .await
        .context("Matrix login failed")?;

    tracing::info!("Logged in as {}", config.username);

    if let Some(name) = &config.display_name {
        tracing::info!("Setting display name to {}", name);
        if let Err(e) = client.account().set_display_name(Some(name)).await {
            tracing::warn!("Failed to set display name: {}", e);
        }
    }

    let start_time = SystemTime::now();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = router.clone();
        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore history delivered by the initial sync.
            let ts = ev.origin_server_ts();
            let event_time = UNIX_EPOCH + Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            let MessageType::Text(text_content) = &original_msg.content.msgtype else {
                return;
            };
            if original_msg.sender == room.own_user_id() {
                return;
            }

            let body = &text_content.body;
            tracing::info!("Received message from {}: {}", original_msg.sender, body);

            let chat = MatrixService::new(room);
            let sender = chat.identity(&original_msg.sender).await;
            if let Err(e) = router.route(Arc::new(chat), body, &sender).await {
                tracing::error!("Failed to route message: {}", e);
            }
        }
    });

    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("Joining room {}", room.room_id());
            if let Err(e) = room.join().await {
                tracing::warn!("Failed to join room {}: {}", room.room_id(), e);
            }
        }
    });

    client
        .sync(SyncSettings::default())
        .await
        .context("Matrix sync stopped")?;
    Ok(())
}
