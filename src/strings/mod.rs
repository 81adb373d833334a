//! # Strings Module
//!
//! Centralizes user-facing strings.
//! Ensures consistency in messaging and easier localization/updates.

pub mod messages;
