//! # Command Router
//!
//! Routes incoming chat messages to the command dispatcher.
//! It strips the command prefix (e.g., `!so`), looks the trigger word up in the configured
//! triggers and dispatches the trigger's template with the remaining words as arguments.

use anyhow::Result;
use std::sync::Arc;

use crate::application::context::AppContext;
use crate::application::dispatcher::Dispatcher;
use crate::application::registry::CommandRegistry;
use crate::application::state::SettingsStore;
use crate::domain::config::AppConfig;
use crate::domain::error::CommandError;
use crate::domain::traits::{AlertSink, ChannelApi, ChatProvider, Store};
use crate::domain::types::UserIdentity;

pub struct CommandRouter {
    config: Arc<AppConfig>,
    registry: Arc<CommandRegistry>,
    store: Arc<dyn Store>,
    api: Arc<dyn ChannelApi>,
    alerts: Arc<dyn AlertSink>,
    settings: Arc<SettingsStore>,
}

impl CommandRouter {
    pub fn new(
        config: Arc<AppConfig>,
        registry: Arc<CommandRegistry>,
        store: Arc<dyn Store>,
        api: Arc<dyn ChannelApi>,
        alerts: Arc<dyn AlertSink>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            config,
            registry,
            store,
            api,
            alerts,
            settings,
        }
    }

    fn is_admin(&self, username: &str) -> bool {
        self.config
            .system
            .admin
            .iter()
            .any(|a| a.to_lowercase() == username.to_lowercase())
    }

    fn context(&self, chat: Arc<dyn ChatProvider>) -> Arc<AppContext> {
        Arc::new(AppContext {
            config: self.config.clone(),
            chat,
            store: self.store.clone(),
            api: self.api.clone(),
            alerts: self.alerts.clone(),
            settings: self.settings.clone(),
        })
    }

    pub async fn route(
        &self,
        chat: Arc<dyn ChatProvider>,
        message: &str,
        sender: &UserIdentity,
    ) -> Result<()> {
        // Every line counts towards the leaderboard, commands included.
        if let Err(e) = self.store.record_chat(sender).await {
            tracing::warn!("Failed to record chat stats for {}: {:#}", sender.username, e);
        }

        let msg = message.trim();
        let Some(body) = msg.strip_prefix(self.config.commands.prefix.as_str()) else {
            return Ok(());
        };

        let mut words = body.split_whitespace();
        let Some(trigger) = words.next() else {
            return Ok(());
        };
        let params: Vec<String> = words.map(str::to_string).collect();

        tracing::info!(
            "Router dispatching trigger='{}' args='{}' sender='{}'",
            trigger,
            params.join(" "),
            sender.username
        );

        let Some(entry) = self.config.commands.triggers.get(trigger) else {
            tracing::debug!("Ignoring unknown trigger '{}'", trigger);
            return Ok(());
        };

        if entry.admin && !self.is_admin(&sender.username) {
            self.context(chat)
                .say(crate::strings::messages::AUTH_DENIED)
                .await;
            return Ok(());
        }

        // Positional ${0} is the trigger word itself.
        let mut positional = Vec::with_capacity(params.len() + 1);
        positional.push(trigger.to_string());
        positional.extend(params);

        let dispatcher = Dispatcher::new(self.registry.clone(), self.context(chat));
        match dispatcher
            .parse_command(&entry.command, &positional, Some(sender))
            .await
        {
            Ok(()) => {}
            Err(CommandError::NotFound(name)) => {
                tracing::warn!(
                    "Trigger '{}' expanded to unknown command '{}'",
                    trigger,
                    name
                );
            }
            Err(e) => {
                tracing::info!("Trigger '{}' from {} failed: {}", trigger, sender.username, e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::EntryKind;
    use crate::interface::commands::build_registry;
    use crate::testing::{BrokenChat, FakeApi, Harness, test_config};

    fn router(harness: &Harness) -> CommandRouter {
        CommandRouter::new(
            harness.ctx.config.clone(),
            Arc::new(build_registry()),
            harness.ctx.store.clone(),
            harness.ctx.api.clone(),
            harness.ctx.alerts.clone(),
            harness.ctx.settings.clone(),
        )
    }

    fn viewer() -> UserIdentity {
        UserIdentity::new("viewer", "Viewer")
    }

    #[test]
    fn test_fixture_has_triggers() {
        assert!(test_config().commands.triggers.contains_key("so"));
    }

    #[tokio::test]
    async fn test_trigger_expands_template() {
        let api = FakeApi::default().with_user("pal", Some("Celeste"), 0);
        let harness = Harness::with_api(api);

        router(&harness)
            .route(harness.ctx.chat.clone(), "!so Pal", &viewer())
            .await
            .unwrap();

        assert_eq!(
            harness.messages(),
            vec!["Viewer says go follow https://twitch.tv/pal (Celeste)"]
        );
    }

    #[tokio::test]
    async fn test_plain_chat_is_counted_not_dispatched() {
        let harness = Harness::new();
        let r = router(&harness);
        r.route(harness.ctx.chat.clone(), "hello there", &viewer())
            .await
            .unwrap();
        r.route(harness.ctx.chat.clone(), "!nosuchtrigger", &viewer())
            .await
            .unwrap();

        assert!(harness.messages().is_empty());
        assert_eq!(harness.store.rank_of("viewer").await.unwrap(), Some(1));
        let top = harness.store.list_ranked(5).await.unwrap();
        assert_eq!(top[0].chats, 2);
    }

    #[tokio::test]
    async fn test_admin_trigger_requires_admin() {
        let harness = Harness::new();
        let r = router(&harness);

        r.route(harness.ctx.chat.clone(), "!addtip drink water", &viewer())
            .await
            .unwrap();
        assert_eq!(harness.messages(), vec![crate::strings::messages::AUTH_DENIED]);

        let admin = UserIdentity::new("TheStreamer", "TheStreamer");
        r.route(harness.ctx.chat.clone(), "!addtip drink water", &admin)
            .await
            .unwrap();
        assert_eq!(harness.messages()[1], "Tip #1 has been added to the list");
    }

    #[tokio::test]
    async fn test_denied_reply_failure_is_contained() {
        let harness = Harness::new();
        router(&harness)
            .route(Arc::new(BrokenChat), "!addtip drink water", &viewer())
            .await
            .unwrap();
        assert!(harness.store.random_entry(EntryKind::Tip).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_handler_failure_does_not_bubble() {
        let harness = Harness::new();
        let result = router(&harness)
            .route(harness.ctx.chat.clone(), "!enter", &viewer())
            .await;
        assert!(result.is_ok());
        assert!(harness.messages().is_empty());
    }
}
