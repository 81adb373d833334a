//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for service credentials, command triggers, and system settings.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    /// Sound effect name -> file served by the overlay.
    #[serde(default)]
    pub sfx: HashMap<String, String>,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML")
    }
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    /// Without a Matrix block the bot runs on the console.
    #[serde(default)]
    pub matrix: Option<MatrixConfig>,
    pub twitch: TwitchConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TwitchConfig {
    pub client_id: String,
    pub token: String,
    /// Login name of the bot's own channel.
    pub channel: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    "https://api.twitch.tv/helix".to_string()
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct OverlayConfig {
    /// Endpoint receiving alert POSTs. Alerts are dropped when unset.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CommandsConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Upper bound on a single `${...}` lookup.
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout_secs: u64,
    /// Chat trigger word -> command template.
    #[serde(default)]
    pub triggers: HashMap<String, TriggerConfig>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            resolve_timeout_secs: default_resolve_timeout(),
            triggers: HashMap::new(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_resolve_timeout() -> u64 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct TriggerConfig {
    /// Template such as `say Welcome ${user}!`
    pub command: String,
    /// Restrict to `system.admin` users.
    #[serde(default)]
    pub admin: bool,
}

/// System-level settings for the bot.
#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub admin: Vec<String>,
    /// Identity used for lines typed on the console.
    #[serde(default = "default_console_user")]
    pub console_user: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            admin: Vec::new(),
            console_user: default_console_user(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_console_user() -> String {
    "streamer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config = AppConfig::from_yaml(
            "services:\n  twitch:\n    client_id: abc\n    token: def\n    channel: somechannel\n",
        )
        .unwrap();

        assert!(config.services.matrix.is_none());
        assert_eq!(config.services.twitch.api_url, "https://api.twitch.tv/helix");
        assert_eq!(config.commands.prefix, "!");
        assert_eq!(config.commands.resolve_timeout_secs, 5);
        assert_eq!(config.system.data_dir, "data");
        assert!(config.overlay.url.is_none());
    }

    #[test]
    fn test_triggers_and_sfx() {
        let yaml = r#"
services:
  twitch:
    client_id: abc
    token: def
    channel: somechannel
sfx:
  airhorn: airhorn.mp3
commands:
  prefix: "?"
  triggers:
    so:
      command: "say Go follow ${1} who was playing ${game ${1}}"
    addtip:
      command: "addtip ${1:}"
      admin: true
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.commands.prefix, "?");
        assert_eq!(config.sfx.get("airhorn").map(String::as_str), Some("airhorn.mp3"));
        assert!(config.commands.triggers["addtip"].admin);
        assert!(!config.commands.triggers["so"].admin);
    }

    #[test]
    fn test_missing_twitch_block_fails() {
        assert!(AppConfig::from_yaml("services: {}\n").is_err());
    }
}
