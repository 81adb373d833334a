//! # Twitch API Adapter
//!
//! Implements `ChannelApi` against the Twitch Helix REST API.
//! Every Helix response wraps its rows in a `data` array; an empty array means "not found".

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::domain::config::TwitchConfig;
use crate::domain::traits::ChannelApi;
use crate::domain::types::Profile;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct HelixResponse<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct HelixUser {
    id: String,
    login: String,
    display_name: String,
}

impl From<HelixUser> for Profile {
    fn from(user: HelixUser) -> Self {
        Profile {
            id: user.id,
            login: user.login,
            display_name: user.display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HelixChannel {
    #[serde(default)]
    game_name: String,
}

#[derive(Debug, Deserialize)]
struct HelixFollower {
    followed_at: String,
}

#[derive(Debug, Deserialize)]
struct HelixStream {
    #[serde(rename = "type", default)]
    kind: String,
}

pub struct TwitchApi {
    client: Client,
    config: TwitchConfig,
    broadcaster: OnceCell<Profile>,
}

impl TwitchApi {
    pub fn new(config: TwitchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            config,
            broadcaster: OnceCell::new(),
        })
    }

    /// GET `{api_url}/{endpoint}` and return the first row of `data`.
    async fn first<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Option<T>> {
        let url = format!("{}/{}", self.config.api_url.trim_end_matches('/'), endpoint);
        let response = self
            .client
            .get(&url)
            .header("Client-Id", &self.config.client_id)
            .bearer_auth(&self.config.token)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            bail!("Helix {} returned {}: {}", endpoint, status, body);
        }

        let body: HelixResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", endpoint))?;
        Ok(body.data.into_iter().next())
    }

    async fn broadcaster(&self) -> Result<&Profile> {
        self.broadcaster
            .get_or_try_init(|| async {
                self.lookup_user(&self.config.channel)
                    .await?
                    .with_context(|| format!("Channel {} does not exist", self.config.channel))
            })
            .await
    }
}

#[async_trait]
impl ChannelApi for TwitchApi {
    async fn lookup_user(&self, name: &str) -> Result<Option<Profile>> {
        let login = name.trim_start_matches('@').to_lowercase();
        let user: Option<HelixUser> = self.first("users", &[("login", login.as_str())]).await?;
        Ok(user.map(Profile::from))
    }

    async fn channel_category(&self, profile: &Profile) -> Result<Option<String>> {
        let channel: Option<HelixChannel> = self
            .first("channels", &[("broadcaster_id", profile.id.as_str())])
            .await?;
        Ok(channel.map(|c| c.game_name).filter(|g| !g.is_empty()))
    }

    async fn follow_since(&self, profile: &Profile, target_id: &str) -> Result<Option<DateTime<Utc>>> {
        let follow: Option<HelixFollower> = self
            .first(
                "channels/followers",
                &[("broadcaster_id", target_id), ("user_id", profile.id.as_str())],
            )
            .await?;
        follow
            .map(|f| parse_timestamp(&f.followed_at))
            .transpose()
    }

    async fn current_game(&self) -> Result<Option<String>> {
        let broadcaster = self.broadcaster().await?;
        self.channel_category(broadcaster).await
    }

    async fn is_live(&self) -> Result<bool> {
        let stream: Option<HelixStream> = self
            .first("streams", &[("user_login", self.config.channel.as_str())])
            .await?;
        Ok(stream.is_some_and(|s| s.kind == "live"))
    }

    async fn broadcaster_id(&self) -> Result<String> {
        Ok(self.broadcaster().await?.id.clone())
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .with_context(|| format!("Invalid timestamp {}", value))
}
