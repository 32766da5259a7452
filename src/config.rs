//! Configuration management

use crate::error::{RelayError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sink: SinkConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Aggregator endpoint
    pub url: Option<String>,
    /// JSON dump to replay instead of polling `url`
    pub input_file: Option<String>,
    /// Page size requested from the aggregator
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_retry_times")]
    pub retry_times: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Channel ids whose messages are dropped before parsing
    #[serde(default)]
    pub blocked_channels: Vec<String>,
    /// Drop scored signals below this (0-100)
    #[serde(default)]
    pub min_quality_score: Option<u8>,
    /// Offset of the zone used for rendered message times
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Pause between deliveries
    #[serde(default)]
    pub delivery_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Dedup record location
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Number of delivered ids kept
    #[serde(default = "default_retain")]
    pub retain: usize,
    /// Recorded only; retention is count-based
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SinkConfig {
    /// Chat webhook; signals go to stdout as JSON lines when unset
    pub webhook_url: Option<String>,
}

impl Config {
    /// Load configuration from file, then `KOL_RELAY__*` environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("KOL_RELAY")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("relay.blocked_channels")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations
    pub fn load_default() -> Result<Self> {
        let paths = ["relay.toml", "~/.config/kol-signal-relay/relay.toml"];

        for path in paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::load(expanded.as_ref());
            }
        }

        Err(RelayError::Config("No configuration file found".into()))
    }

    /// Reject configurations a run cannot start from
    pub fn validate(&self) -> Result<()> {
        let has_url = self.source.url.as_deref().is_some_and(|u| !u.trim().is_empty());
        let has_file = self
            .source
            .input_file
            .as_deref()
            .is_some_and(|f| !f.trim().is_empty());
        if !has_url && !has_file {
            return Err(RelayError::Config(
                "source.url or source.input_file must be set".into(),
            ));
        }
        if self.source.limit == 0 {
            return Err(RelayError::Config("source.limit must be positive".into()));
        }
        if self.storage.retain == 0 {
            return Err(RelayError::Config("storage.retain must be positive".into()));
        }
        if !(-12..=14).contains(&self.relay.utc_offset_hours) {
            return Err(RelayError::Config(format!(
                "relay.utc_offset_hours out of range: {}",
                self.relay.utc_offset_hours
            )));
        }
        if self.relay.min_quality_score.is_some_and(|s| s > 100) {
            return Err(RelayError::Config(
                "relay.min_quality_score must be within 0-100".into(),
            ));
        }
        Ok(())
    }
}

impl RelayConfig {
    pub fn blocked_set(&self) -> HashSet<String> {
        self.blocked_channels
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

impl StorageConfig {
    /// Dedup record path with `~` and env vars expanded
    pub fn resolved_path(&self) -> PathBuf {
        match shellexpand::full(&self.path) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => PathBuf::from(&self.path),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            input_file: None,
            limit: default_limit(),
            retry_times: default_retry_times(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            blocked_channels: Vec::new(),
            min_quality_score: None,
            utc_offset_hours: default_utc_offset_hours(),
            delivery_delay_ms: 0,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            retain: default_retain(),
            max_age_days: default_max_age_days(),
        }
    }
}

fn default_limit() -> usize {
    100
}

fn default_retry_times() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_utc_offset_hours() -> i32 {
    8
}

fn default_storage_path() -> String {
    "./data/processed_signals.json".to_string()
}

fn default_retain() -> usize {
    crate::storage::DEFAULT_RETAIN
}

fn default_max_age_days() -> u32 {
    7
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Config {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = parse(
            r#"
            [source]
            url = "http://localhost:3000/api/frontend-messages"
            "#,
        );
        assert_eq!(config.source.limit, 100);
        assert_eq!(config.source.retry_times, 3);
        assert_eq!(config.source.retry_delay_ms, 1000);
        assert_eq!(config.relay.utc_offset_hours, 8);
        assert!(config.relay.blocked_channels.is_empty());
        assert!(config.relay.min_quality_score.is_none());
        assert_eq!(config.storage.retain, 1000);
        assert_eq!(config.storage.max_age_days, 7);
        assert_eq!(config.storage.path, "./data/processed_signals.json");
        assert!(config.sink.webhook_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            r#"
            [source]
            input_file = "dump.json"
            limit = 50

            [relay]
            blocked_channels = ["1234", " 5678 ", ""]
            min_quality_score = 60
            utc_offset_hours = 0

            [storage]
            path = "/tmp/seen.json"
            retain = 10

            [sink]
            webhook_url = "https://example.com/hook"
            "#,
        );
        assert_eq!(config.source.limit, 50);
        assert_eq!(config.relay.min_quality_score, Some(60));
        let blocked = config.relay.blocked_set();
        assert_eq!(blocked.len(), 2);
        assert!(blocked.contains("5678"));
        assert_eq!(config.storage.resolved_path(), PathBuf::from("/tmp/seen.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let config = parse("[source]\nlimit = 10\n");
        let err = config.validate().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_bad_values_rejected() {
        let mut config = parse("[source]\nurl = \"http://x\"\n");
        config.storage.retain = 0;
        assert!(config.validate().is_err());

        let mut config = parse("[source]\nurl = \"http://x\"\n");
        config.relay.utc_offset_hours = 20;
        assert!(config.validate().is_err());

        let mut config = parse("[source]\nurl = \"http://x\"\n");
        config.relay.min_quality_score = Some(101);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("kol-relay-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[source]\nurl = \"http://localhost\"\n[storage]\nretain = 5\n")
            .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.retain, 5);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/kol/relay.toml").unwrap_err();
        assert!(err.is_fatal());
    }
}
