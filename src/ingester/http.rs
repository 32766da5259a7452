//! Aggregator HTTP source
//!
//! Polls the frontend-messages endpoint with browser-like headers and a
//! fixed-delay retry.

use super::{decode_messages, MessageSource, RawMessage};
use crate::config::SourceConfig;
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// HTTP source for the message aggregator
pub struct HttpSource {
    http: reqwest::Client,
    url: String,
    limit: usize,
    retry_times: u32,
    retry_delay: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, config: &SourceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
            limit: config.limit,
            retry_times: config.retry_times.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    async fn fetch_page(&self) -> Result<Vec<RawMessage>> {
        let resp = self
            .http
            .get(&self.url)
            .query(&[("type", "all".to_string()), ("limit", self.limit.to_string())])
            .header("Accept", "application/json, text/plain, */*")
            .header("Accept-Language", "zh-CN,zh;q=0.9")
            .send()
            .await?
            .error_for_status()?;

        let body = resp.text().await?;
        decode_messages(&body)
    }
}

#[async_trait]
impl MessageSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self) -> Result<Vec<RawMessage>> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.fetch_page().await {
                Ok(messages) => {
                    tracing::debug!("Fetched {} messages from {}", messages.len(), self.url);
                    return Ok(messages);
                }
                Err(e) => {
                    tracing::warn!(
                        "Fetch attempt {}/{} failed: {}",
                        attempt,
                        self.retry_times,
                        e
                    );
                    if attempt >= self.retry_times {
                        return Err(RelayError::Source(format!(
                            "gave up after {} attempts: {}",
                            self.retry_times, e
                        )));
                    }
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }
}
