//! Shared fakes for unit tests.

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::context::AppContext;
use crate::application::state::{Settings, SettingsStore};
use crate::domain::config::AppConfig;
use crate::domain::error::CommandError;
use crate::domain::traits::{AlertSink, ChannelApi, ChatProvider};
use crate::domain::types::Profile;
use crate::infrastructure::store::JsonStore;
use crate::interface::commands::build_registry;

/// Collects every line the bot says.
#[derive(Default)]
pub struct RecordingChat {
    sent: Mutex<Vec<String>>,
}

impl RecordingChat {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for RecordingChat {
    async fn send_message(&self, content: &str) -> Result<(), String> {
        self.sent.lock().unwrap().push(content.to_string());
        Ok(())
    }

    fn channel(&self) -> String {
        "#test".to_string()
    }
}

/// A chat whose sends never complete.
pub struct StalledChat;

#[async_trait]
impl ChatProvider for StalledChat {
    async fn send_message(&self, _content: &str) -> Result<(), String> {
        std::future::pending::<()>().await;
        Ok(())
    }

    fn channel(&self) -> String {
        "#stalled".to_string()
    }
}

/// A chat whose sends always fail.
pub struct BrokenChat;

#[async_trait]
impl ChatProvider for BrokenChat {
    async fn send_message(&self, _content: &str) -> Result<(), String> {
        Err("connection closed".to_string())
    }

    fn channel(&self) -> String {
        "#broken".to_string()
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    sent: Mutex<Vec<(String, serde_json::Value)>>,
}

#[async_trait]
impl AlertSink for RecordingAlerts {
    async fn send_alert(&self, kind: &str, payload: serde_json::Value) -> Result<()> {
        self.sent.lock().unwrap().push((kind.to_string(), payload));
        Ok(())
    }
}

#[derive(Clone)]
struct FakeUser {
    category: Option<String>,
    delay: Duration,
}

/// Scripted streaming platform.
#[derive(Default, Clone)]
pub struct FakeApi {
    users: HashMap<String, FakeUser>,
    follows: HashMap<String, DateTime<Utc>>,
    game: Option<String>,
    live: bool,
    failing: bool,
}

impl FakeApi {
    /// `delay_ms` is applied to the user's category lookup.
    pub fn with_user(mut self, name: &str, category: Option<&str>, delay_ms: u64) -> Self {
        self.users.insert(
            name.to_lowercase(),
            FakeUser {
                category: category.map(str::to_string),
                delay: Duration::from_millis(delay_ms),
            },
        );
        self
    }

    pub fn with_follow(mut self, name: &str, since: DateTime<Utc>) -> Self {
        self.follows.insert(name.to_lowercase(), since);
        self
    }

    pub fn with_game(mut self, game: &str) -> Self {
        self.game = Some(game.to_string());
        self
    }

    pub fn live(mut self) -> Self {
        self.live = true;
        self
    }

    /// Every call returns an error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            bail!("platform unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelApi for FakeApi {
    async fn lookup_user(&self, name: &str) -> Result<Option<Profile>> {
        self.check()?;
        let login = name.to_lowercase();
        Ok(self.users.contains_key(&login).then(|| Profile {
            id: format!("id-{login}"),
            login: login.clone(),
            display_name: name.to_string(),
        }))
    }

    async fn channel_category(&self, profile: &Profile) -> Result<Option<String>> {
        self.check()?;
        let Some(user) = self.users.get(&profile.login) else {
            return Ok(None);
        };
        tokio::time::sleep(user.delay).await;
        Ok(user.category.clone())
    }

    async fn follow_since(&self, profile: &Profile, _target_id: &str) -> Result<Option<DateTime<Utc>>> {
        self.check()?;
        Ok(self.follows.get(&profile.login).copied())
    }

    async fn current_game(&self) -> Result<Option<String>> {
        self.check()?;
        Ok(self.game.clone())
    }

    async fn is_live(&self) -> Result<bool> {
        self.check()?;
        Ok(self.live)
    }

    async fn broadcaster_id(&self) -> Result<String> {
        self.check()?;
        Ok("id-broadcaster".to_string())
    }
}

pub fn test_config() -> AppConfig {
    let yaml = r#"
services:
  twitch:
    client_id: test-client
    token: test-token
    channel: thestreamer
sfx:
  airhorn: airhorn.mp3
commands:
  resolve_timeout_secs: 2
  triggers:
    so:
      command: "say ${user} says go follow https://twitch.tv/${channel ${1}} (${game ${1}})"
    addtip:
      command: "addtip ${1:}"
      admin: true
    enter:
      command: "raffle ${user} has entered the raffle!"
system:
  admin:
    - thestreamer
"#;
    AppConfig::from_yaml(yaml).unwrap()
}

/// An `AppContext` wired to recording fakes and an in-memory store.
pub struct Harness {
    pub ctx: Arc<AppContext>,
    pub chat: Arc<RecordingChat>,
    pub alerts: Arc<RecordingAlerts>,
    pub store: Arc<JsonStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_api(FakeApi::default())
    }

    pub fn with_api(api: FakeApi) -> Self {
        let chat = Arc::new(RecordingChat::default());
        let alerts = Arc::new(RecordingAlerts::default());
        let store = Arc::new(JsonStore::in_memory());
        let ctx = Arc::new(AppContext {
            config: Arc::new(test_config()),
            chat: chat.clone(),
            store: store.clone(),
            api: Arc::new(api),
            alerts: alerts.clone(),
            settings: Arc::new(SettingsStore::in_memory(Settings::default())),
        });
        Self {
            ctx,
            chat,
            alerts,
            store,
        }
    }

    /// Replaces the in-memory settings, e.g. with a file-backed store.
    pub fn with_settings(mut self, settings: SettingsStore) -> Self {
        let mut ctx = (*self.ctx).clone();
        ctx.settings = Arc::new(settings);
        self.ctx = Arc::new(ctx);
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.chat.messages()
    }

    pub fn alerts(&self) -> Vec<(String, serde_json::Value)> {
        self.alerts.sent.lock().unwrap().clone()
    }

    /// Calls a registered handler directly, bypassing template expansion.
    pub async fn run(&self, name: &str, user: Option<&str>, args: &[&str]) -> Result<(), CommandError> {
        let handler = build_registry()
            .get(name)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))?;
        let args = args.iter().map(|a| a.to_string()).collect();
        handler
            .call(self.ctx.clone(), user.map(str::to_string), args)
            .await
    }
}
