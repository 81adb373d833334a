//! # Command Registry
//!
//! Maps command names to handlers. Built once at startup by merging handler sets
//! contributed by feature modules, then shared read-only between invocations.

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::application::context::AppContext;
use crate::domain::error::CommandError;

pub type HandlerFuture = BoxFuture<'static, Result<(), CommandError>>;

/// A command implementation.
///
/// `user` is the invoking user's plain username, `args` the tokens after the
/// command name. Any state a handler needs is reached through `ctx`.
pub trait CommandHandler: Send + Sync {
    fn call(&self, ctx: Arc<AppContext>, user: Option<String>, args: Vec<String>) -> HandlerFuture;
}

impl<F, Fut> CommandHandler for F
where
    F: Fn(Arc<AppContext>, Option<String>, Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
{
    fn call(&self, ctx: Arc<AppContext>, user: Option<String>, args: Vec<String>) -> HandlerFuture {
        Box::pin(self(ctx, user, args))
    }
}

/// Name/handler pairs contributed by one module.
pub type HandlerSet = Vec<(&'static str, Arc<dyn CommandHandler>)>;

pub fn handler<H: CommandHandler + 'static>(h: H) -> Arc<dyn CommandHandler> {
    Arc::new(h)
}

#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}

/// Merges handler sets in the order they are added. A later binding for an
/// existing name replaces the earlier one.
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(mut self, module: &str, set: HandlerSet) -> Self {
        for (name, handler) in set {
            if self.handlers.insert(name.to_string(), handler).is_some() {
                tracing::debug!("Module '{}' overrides command '{}'", module, name);
            }
        }
        self
    }

    pub fn build(self) -> CommandRegistry {
        CommandRegistry {
            handlers: self.handlers,
        }
    }
}
