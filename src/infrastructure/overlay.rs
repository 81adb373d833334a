//! # Overlay Alerts
//!
//! Implements `AlertSink` by POSTing `{ "type": kind, "params": payload }` to the stream
//! overlay. Without a configured URL alerts are only logged.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::domain::traits::AlertSink;

pub struct HttpAlertSink {
    client: Client,
    url: Option<String>,
}

impl HttpAlertSink {
    pub fn new(url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl AlertSink for HttpAlertSink {
    async fn send_alert(&self, kind: &str, payload: serde_json::Value) -> Result<()> {
        let Some(url) = &self.url else {
            tracing::debug!("No overlay configured, dropping {} alert", kind);
            return Ok(());
        };

        let response = self
            .client
            .post(url)
            .json(&json!({ "type": kind, "params": payload }))
            .send()
            .await
            .with_context(|| format!("Failed to reach overlay at {}", url))?;

        if !response.status().is_success() {
            bail!("Overlay rejected {} alert: {}", kind, response.status());
        }
        tracing::info!("Sent {} alert", kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_overlay_drops_alerts() {
        let sink = HttpAlertSink::new(None).unwrap();
        assert!(sink.send_alert("sfx", json!({ "name": "airhorn" })).await.is_ok());
    }
}
