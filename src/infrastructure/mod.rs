//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatProvider, Store, ChannelApi, AlertSink).

pub mod console;
pub mod matrix;
pub mod overlay;
pub mod store;
pub mod twitch;
