//! # Main Entry Point
//!
//! Initializes the bot:
//! - Domain: Configuration and Types
//! - Infrastructure: Store, Twitch API, Overlay, Matrix / Console chat
//! - Application: Template expansion, Registry, Dispatcher, Router
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::application::router::CommandRouter;
use crate::application::state::SettingsStore;
use crate::domain::config::AppConfig;
use crate::domain::types::UserIdentity;
use crate::infrastructure::overlay::HttpAlertSink;
use crate::infrastructure::store::JsonStore;
use crate::infrastructure::twitch::TwitchApi;
use crate::interface::commands::build_registry;

#[derive(Parser, Debug)]
#[command(version, about = "Chat command bot for live streams")]
struct Cli {
    /// Path to the YAML configuration
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Chat from stdin instead of connecting to Matrix
    #[arg(long)]
    console: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let data_dir = PathBuf::from(&config.system.data_dir);
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir).context("Failed to create data directory")?;
    }

    // Clear previous session log
    let log_path = data_dir.join("session.log");
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(&data_dir, "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn,reqwest=warn",
        )
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    // The console front-end owns stdout for chat lines.
    let stdout_layer = if cli.console {
        None
    } else {
        Some(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    tracing::info!("Starting streambot...");

    // 3. Initialize Infrastructure
    let store = Arc::new(JsonStore::open(data_dir.join("store.json"))?);
    let settings = Arc::new(SettingsStore::load(data_dir.join("settings.json")));
    let api = Arc::new(TwitchApi::new(config.services.twitch.clone())?);
    let alerts = Arc::new(HttpAlertSink::new(config.overlay.url.clone())?);

    // 4. Initialize Application Components
    let registry = Arc::new(build_registry());
    tracing::info!("Registered commands: {}", registry.names().join(", "));

    let config = Arc::new(config);
    let router = Arc::new(CommandRouter::new(
        config.clone(),
        registry,
        store,
        api,
        alerts,
        settings,
    ));

    // 5. Chat Front-End
    match (&config.services.matrix, cli.console) {
        (Some(matrix), false) => infrastructure::matrix::run(matrix, router).await,
        _ => {
            let name = config.system.console_user.clone();
            let identity = UserIdentity::new(name.to_lowercase(), name);
            infrastructure::console::run(router, identity).await
        }
    }
}
