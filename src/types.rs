//! Core types for the signal relay

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for a field that could not be extracted.
pub const UNKNOWN: &str = "unknown";

/// Placeholder entry when no entry price was given.
pub const MARKET_PRICE: &str = "market price";

/// Trade direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
    Spot,
    Close,
    #[default]
    Unknown,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
            Direction::Spot => "spot",
            Direction::Close => "close",
            Direction::Unknown => UNKNOWN,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Direction::Unknown)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spot vs. derivatives trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Spot,
    Contract,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Spot => "spot",
            TradeType::Contract => "contract",
        }
    }
}

/// Which stage of the fallback chain produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseStrategy {
    /// Publisher-supplied hint text
    Structured,
    /// Free-form content re-read as a hint
    Freeform,
    /// Substring/keyword probes over hint and content together
    KeywordChain,
    /// Nothing resolved; content echoed
    Minimal,
}

/// Qualitative bucket derived from a quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityLevel {
    ExtremeLow,
    Low,
    Medium,
    High,
    ExtremeHigh,
}

impl QualityLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => QualityLevel::ExtremeHigh,
            75..=89 => QualityLevel::High,
            50..=74 => QualityLevel::Medium,
            30..=49 => QualityLevel::Low,
            _ => QualityLevel::ExtremeLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::ExtremeLow => "extreme-low",
            QualityLevel::Low => "low",
            QualityLevel::Medium => "medium",
            QualityLevel::High => "high",
            QualityLevel::ExtremeHigh => "extreme-high",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extraction confidence for one parsed signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// 0 - 100
    pub score: u8,
    pub level: QualityLevel,
    /// One human-readable line per scoring factor
    pub details: Vec<String>,
}

/// Structured trading call extracted from one raw message.
///
/// Optional fields hold `None` when extraction missed; the accessors
/// substitute the placeholder strings so every record reads uniformly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSignal {
    pub id: String,
    pub author: String,
    pub platform: String,
    pub channel: String,
    /// Unix seconds or millis, as delivered
    pub timestamp: Option<i64>,
    pub symbol: Option<String>,
    pub direction: Direction,
    pub entry_price: Option<String>,
    pub stop_loss: Option<String>,
    pub target_price: Option<String>,
    pub leverage: Option<String>,
    pub position_size: Option<String>,
    pub trade_type: Option<TradeType>,
    pub analysis: Option<String>,
    pub original_content: String,
    pub original_link: String,
    pub message_content: String,
    pub strategy: ParseStrategy,
    pub quality: Option<QualityAssessment>,
}

impl ParsedSignal {
    pub fn symbol(&self) -> &str {
        self.symbol.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn entry_price(&self) -> &str {
        self.entry_price.as_deref().unwrap_or(MARKET_PRICE)
    }

    pub fn stop_loss(&self) -> &str {
        self.stop_loss.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn target_price(&self) -> &str {
        self.target_price.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn leverage(&self) -> &str {
        self.leverage.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn has_symbol(&self) -> bool {
        self.symbol.is_some()
    }
}

/// Fully-populated record handed to a sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundSignal {
    pub id: String,
    pub title: String,
    pub author: String,
    pub symbol: String,
    pub direction: String,
    pub entry_price: String,
    pub stop_loss: String,
    pub target_price: String,
    pub leverage: String,
    pub position_size: String,
    pub trade_type: String,
    pub analysis: String,
    pub message_time: String,
    pub channel: String,
    pub original_link: String,
    pub message_content: String,
    pub quality: u8,
    pub quality_level: String,
    pub quality_details: Vec<String>,
}

impl OutboundSignal {
    /// Markdown body used by chat webhooks
    pub fn to_markdown(&self) -> String {
        let mut text = format!(
            "📊 KOL signal\n\n\
             👤 {}\n\
             📈 Symbol: {}\n\
             ➡️ Direction: {}\n\
             🎯 Entry: {}\n\
             🛑 Stop loss: {}\n\
             🎯 Target: {}\n\
             🔢 Leverage: {}\n\
             📢 Channel: {}\n\
             ⏰ Time: {}\n\
             ⭐ Quality: {} ({})\n\n",
            self.author,
            self.symbol,
            self.direction,
            self.entry_price,
            self.stop_loss,
            self.target_price,
            self.leverage,
            self.channel,
            self.message_time,
            self.quality,
            self.quality_level,
        );

        if !self.analysis.is_empty() {
            text.push_str(&format!("💡 Analysis:\n{}\n\n", self.analysis));
        }
        if !self.original_link.is_empty() {
            text.push_str(&format!("🔗 [Original message]({})\n\n", self.original_link));
        }
        text.push_str(&format!("📝 Content:\n{}", self.message_content));
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(QualityLevel::from_score(100), QualityLevel::ExtremeHigh);
        assert_eq!(QualityLevel::from_score(90), QualityLevel::ExtremeHigh);
        assert_eq!(QualityLevel::from_score(89), QualityLevel::High);
        assert_eq!(QualityLevel::from_score(75), QualityLevel::High);
        assert_eq!(QualityLevel::from_score(74), QualityLevel::Medium);
        assert_eq!(QualityLevel::from_score(50), QualityLevel::Medium);
        assert_eq!(QualityLevel::from_score(49), QualityLevel::Low);
        assert_eq!(QualityLevel::from_score(30), QualityLevel::Low);
        assert_eq!(QualityLevel::from_score(29), QualityLevel::ExtremeLow);
        assert_eq!(QualityLevel::from_score(0), QualityLevel::ExtremeLow);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut previous = QualityLevel::from_score(0);
        for score in 1..=100u8 {
            let level = QualityLevel::from_score(score);
            assert!(level >= previous, "level dropped at {}", score);
            previous = level;
        }
    }

    #[test]
    fn test_serialization_names() {
        assert_eq!(serde_json::to_string(&Direction::Long).unwrap(), "\"long\"");
        assert_eq!(serde_json::to_string(&Direction::Unknown).unwrap(), "\"unknown\"");
        assert_eq!(
            serde_json::to_string(&QualityLevel::ExtremeHigh).unwrap(),
            "\"extreme-high\""
        );
        assert_eq!(
            serde_json::to_string(&ParseStrategy::KeywordChain).unwrap(),
            "\"keyword-chain\""
        );
    }
}
