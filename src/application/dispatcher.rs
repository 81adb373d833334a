//! # Command Dispatcher
//!
//! Expands a command template and runs the matching handler:
//!
//! 1. positional placeholders are substituted from the invocation's arguments
//! 2. named placeholders of the result are resolved concurrently
//! 3. resolved values are put back in discovery order and the text is tokenized
//! 4. the first token selects the handler, the rest become its arguments
//!
//! Handler failures (including panics) stop here: they are logged and returned
//! to the caller as a `CommandError`.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use crate::application::context::AppContext;
use crate::application::registry::CommandRegistry;
use crate::application::resolver::NamedResolver;
use crate::application::template;
use crate::domain::error::CommandError;
use crate::domain::types::{InvocationContext, ParsedInvocation, UserIdentity};

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    ctx: Arc<AppContext>,
    resolver: NamedResolver,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>, ctx: Arc<AppContext>) -> Self {
        let timeout = Duration::from_secs(ctx.config.commands.resolve_timeout_secs);
        let resolver = NamedResolver::new(ctx.api.clone(), timeout);
        Self {
            registry,
            ctx,
            resolver,
        }
    }

    /// Expands `command` with `params` on behalf of `identity` and runs the result.
    pub async fn parse_command(
        &self,
        command: &str,
        params: &[String],
        identity: Option<&UserIdentity>,
    ) -> Result<(), CommandError> {
        let invocation = InvocationContext::new(identity.cloned(), command, params.to_vec());
        let parsed = self.expand(&invocation).await?;
        self.dispatch(parsed, &invocation).await
    }

    /// Runs the whole substitution pipeline without invoking anything.
    pub async fn expand(
        &self,
        invocation: &InvocationContext,
    ) -> Result<ParsedInvocation, CommandError> {
        let expanded =
            template::substitute_positional(&invocation.raw_text, &invocation.positional_args);

        let named = template::scan_named(&expanded);
        let values = self
            .resolver
            .resolve_all(&expanded, &named, invocation.identity.as_ref())
            .await;
        let text = template::reassemble(&expanded, &named, values);

        let parsed =
            template::tokenize(&text).ok_or_else(|| CommandError::NotFound(String::new()))?;
        if !self.registry.contains(&parsed.command) {
            return Err(CommandError::NotFound(parsed.command));
        }
        Ok(parsed)
    }

    pub async fn dispatch(
        &self,
        parsed: ParsedInvocation,
        invocation: &InvocationContext,
    ) -> Result<(), CommandError> {
        let Some(handler) = self.registry.get(&parsed.command) else {
            tracing::debug!("No handler registered for '{}'", parsed.command);
            return Err(CommandError::NotFound(parsed.command));
        };

        tracing::info!(
            "Dispatching cmd='{}' args='{}' user='{}'",
            parsed.command,
            parsed.args.join(" "),
            invocation.username().as_deref().unwrap_or("-")
        );

        let future = handler.call(self.ctx.clone(), invocation.username(), parsed.args);
        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::warn!("Command '{}' failed: {}", parsed.command, e);
                Err(e)
            }
            Err(_) => {
                tracing::error!("Command '{}' panicked", parsed.command);
                Err(CommandError::Failed(format!("{} panicked", parsed.command)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::registry::{RegistryBuilder, handler};
    use crate::interface::commands::build_registry;
    use crate::testing::{FakeApi, Harness};

    fn dispatcher(harness: &Harness) -> Dispatcher {
        Dispatcher::new(Arc::new(build_registry()), harness.ctx.clone())
    }

    fn params(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_unknown_command_is_not_found() {
        let harness = Harness::new();
        let result = dispatcher(&harness).parse_command("frobnicate", &[], None).await;
        assert_eq!(result, Err(CommandError::NotFound("frobnicate".to_string())));
        assert!(harness.messages().is_empty());
    }

    #[tokio::test]
    async fn test_empty_expansion_is_not_found() {
        let harness = Harness::new();
        let result = dispatcher(&harness).parse_command("${3}", &params(&["a"]), None).await;
        assert_eq!(result, Err(CommandError::NotFound(String::new())));
        assert!(harness.messages().is_empty());
    }

    #[tokio::test]
    async fn test_command_name_is_case_sensitive() {
        let harness = Harness::new();
        let result = dispatcher(&harness).parse_command("SAY hi", &[], None).await;
        assert_eq!(result, Err(CommandError::NotFound("SAY".to_string())));
    }

    #[tokio::test]
    async fn test_full_expansion_into_say() {
        let api = FakeApi::default().with_user("coolfriend", Some("Hades"), 0);
        let harness = Harness::with_api(api);
        let alice = UserIdentity::new("alice", "Alice");

        dispatcher(&harness)
            .parse_command(
                "say ${user} says: go follow ${channel ${1}}, last seen playing ${game ${1}}!",
                &params(&["!so", "CoolFriend"]),
                Some(&alice),
            )
            .await
            .unwrap();

        assert_eq!(
            harness.messages(),
            vec!["Alice says: go follow coolfriend, last seen playing Hades!"]
        );
    }

    #[tokio::test]
    async fn test_command_name_may_come_from_arguments() {
        let harness = Harness::new();
        dispatcher(&harness)
            .parse_command("${0:}", &params(&["say", "hello", "world"]), None)
            .await
            .unwrap();
        assert_eq!(harness.messages(), vec!["hello world"]);
    }

    #[tokio::test]
    async fn test_expand_collapses_whitespace() {
        let harness = Harness::new();
        let invocation = InvocationContext::new(None, "say  ${0}   ${5} end", params(&["x"]));
        let parsed = dispatcher(&harness).expand(&invocation).await.unwrap();
        assert_eq!(parsed.command, "say");
        assert_eq!(parsed.args, vec!["x", "end"]);
    }

    #[tokio::test]
    async fn test_handler_receives_username() {
        async fn whoami(
            ctx: Arc<AppContext>,
            user: Option<String>,
            _args: Vec<String>,
        ) -> Result<(), CommandError> {
            ctx.say(user.as_deref().unwrap_or("nobody")).await;
            Ok(())
        }

        let harness = Harness::new();
        let registry = RegistryBuilder::new()
            .extend("test", vec![("whoami", handler(whoami))])
            .build();
        let dispatcher = Dispatcher::new(Arc::new(registry), harness.ctx.clone());

        let bob = UserIdentity::new("bob", "Bobby");
        dispatcher.parse_command("whoami", &[], Some(&bob)).await.unwrap();
        dispatcher.parse_command("whoami", &[], None).await.unwrap();
        assert_eq!(harness.messages(), vec!["bob", "nobody"]);
    }

    #[tokio::test]
    async fn test_handler_errors_are_returned() {
        let harness = Harness::new();
        let result = dispatcher(&harness).parse_command("edittip abc x", &[], None).await;
        assert_eq!(result, Err(CommandError::InvalidArguments));
    }

    #[tokio::test]
    async fn test_handler_panic_is_contained() {
        async fn explode(
            _ctx: Arc<AppContext>,
            _user: Option<String>,
            _args: Vec<String>,
        ) -> Result<(), CommandError> {
            panic!("boom");
        }

        let harness = Harness::new();
        let registry = RegistryBuilder::new()
            .extend("test", vec![("explode", handler(explode))])
            .build();
        let dispatcher = Dispatcher::new(Arc::new(registry), harness.ctx.clone());

        let result = dispatcher.parse_command("explode", &[], None).await;
        assert!(matches!(result, Err(CommandError::Failed(_))));
    }
}
