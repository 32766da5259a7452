//! Signal delivery
//!
//! Hands outbound signals to:
//! - A chat webhook (markdown card plus the raw record)
//! - Stdout, one JSON object per line

#[cfg(test)]
mod tests;

use crate::error::{RelayError, Result};
use crate::types::OutboundSignal;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// Delivery target for outbound signals
#[async_trait]
pub trait SignalSink: Send + Sync {
    /// Sink name
    fn name(&self) -> &str;

    /// Deliver one signal. `Ok` means the id may be marked seen.
    async fn deliver(&self, signal: &OutboundSignal) -> Result<()>;
}

/// Prints each signal as a JSON line
#[derive(Debug, Default, Clone)]
pub struct StdoutSink;

#[async_trait]
impl SignalSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn deliver(&self, signal: &OutboundSignal) -> Result<()> {
        let line = serde_json::to_string(signal)?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", line)?;
        Ok(())
    }
}

/// Chat webhook sink
#[derive(Clone)]
pub struct WebhookSink {
    http: Client,
    url: String,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct MarkdownCard<'a> {
    title: &'a str,
    text: String,
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    msgtype: &'static str,
    markdown: MarkdownCard<'a>,
    signal: &'a OutboundSignal,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            url: url.into(),
            enabled: true,
        }
    }

    /// Sink that accepts everything and sends nothing
    pub fn disabled() -> Self {
        Self {
            http: Client::new(),
            url: String::new(),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn body<'a>(signal: &'a OutboundSignal) -> WebhookMessage<'a> {
        WebhookMessage {
            msgtype: "markdown",
            markdown: MarkdownCard {
                title: &signal.title,
                text: signal.to_markdown(),
            },
            signal,
        }
    }
}

#[async_trait]
impl SignalSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, signal: &OutboundSignal) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let response = self.http.post(&self.url).json(&Self::body(signal)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Webhook delivery of {} failed: {} {}", signal.id, status, error_text);
            return Err(RelayError::Sink(format!("webhook returned {}", status)));
        }

        Ok(())
    }
}
