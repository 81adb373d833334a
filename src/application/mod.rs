//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot.
//! This includes template expansion, placeholder resolution, the command registry,
//! dispatching, message routing and the shared runtime settings.

pub mod context;
pub mod dispatcher;
pub mod registry;
pub mod resolver;
pub mod router;
pub mod state;
pub mod template;
