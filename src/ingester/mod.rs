//! Raw message ingestion
//!
//! Collects trading-call messages from:
//! - The aggregator HTTP endpoint (paged JSON)
//! - JSON dumps on disk (offline replay)

pub mod file;
pub mod http;

#[cfg(test)]
mod tests;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use file::FileSource;
pub use http::HttpSource;

/// Raw message as harvested from a chat community
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMessage {
    /// Aggregator record id (also the dedup key)
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Source platform: "discord", "kook", "telegram", ...
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub guild_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub message_id: Option<String>,
    #[serde(default)]
    pub author_nickname: Option<String>,
    #[serde(default)]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub message_content: Option<String>,
    /// Pre-structured hint supplied by the publisher
    #[serde(default)]
    pub signal: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
    /// Unix seconds or millis; `None` when missing or non-numeric
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<i64>,
    /// Display string from the aggregator, informational only
    #[serde(default)]
    pub message_time: Option<String>,
}

impl RawMessage {
    /// Hint text, if present and not blank
    pub fn hint(&self) -> Option<&str> {
        non_blank(self.signal.as_deref())
    }

    /// Message content, if present and not blank
    pub fn content(&self) -> Option<&str> {
        non_blank(self.message_content.as_deref())
    }

    /// Identifier recorded in the dedup store
    pub fn dedup_key(&self) -> String {
        if !self.id.is_empty() {
            return self.id.clone();
        }
        format!(
            "{}:{}:{}",
            self.platform.as_deref().unwrap_or_default(),
            self.channel_id.as_deref().unwrap_or_default(),
            self.message_id.as_deref().unwrap_or_default()
        )
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

/// Aggregator response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePage {
    #[serde(default)]
    pub messages: Vec<RawMessage>,
}

/// Decode a payload that is either `{"messages": [...]}` or a bare array
pub fn decode_messages(payload: &str) -> Result<Vec<RawMessage>> {
    let value: Value = serde_json::from_str(payload)?;
    let messages = match value {
        Value::Array(_) => serde_json::from_value(value)?,
        other => serde_json::from_value::<MessagePage>(other)?.messages,
    };
    Ok(messages)
}

/// Message source trait
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Source name
    fn name(&self) -> &str;

    /// Fetch one ordered batch of raw messages
    async fn fetch(&self) -> Result<Vec<RawMessage>>;
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?.unwrap_or_default())
}

fn opt_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    })
}
