use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use super::{ChatRequest, DispatchError, Webhook, extract_answer};

/// Talks to the orchestrator over HTTP. One POST per message.
pub struct WebhookClient {
    client: reqwest::Client,
    url: Url,
    answer_field: String,
}

impl WebhookClient {
    pub fn new(url: &str, answer_field: &str, timeout: Duration) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            bail!("no webhook URL configured. Pass --webhook-url or set PARLEY_WEBHOOK_URL.");
        }
        let url = Url::parse(url).with_context(|| format!("invalid webhook URL: {url}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("webhook URL must be http or https, got {}", url.scheme());
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            url,
            answer_field: answer_field.to_string(),
        })
    }

    /// Host part of the webhook URL, for display. Never shows the path,
    /// which often carries the webhook's secret id.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("?")
    }

    pub fn answer_field(&self) -> &str {
        &self.answer_field
    }
}

#[async_trait]
impl Webhook for WebhookClient {
    async fn send(&self, request: &ChatRequest) -> Result<String, DispatchError> {
        debug!(
            session_id = %request.session_id,
            chars = request.text.chars().count(),
            host = self.host(),
            "posting message to webhook"
        );

        let resp = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "webhook request failed");
                DispatchError::Connection(e.to_string())
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "webhook returned non-200");
            return Err(DispatchError::Status(status.as_u16()));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            warn!(error = %e, "webhook response is not JSON");
            DispatchError::Decode(e.to_string())
        })?;

        if body.get(&self.answer_field).is_none() {
            warn!(field = %self.answer_field, "webhook response has no answer field");
        }

        Ok(extract_answer(&body, &self.answer_field))
    }
}
