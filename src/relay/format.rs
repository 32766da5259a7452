//! Outbound record formatting
//!
//! Sentinels are substituted here and nowhere earlier.

use crate::types::{OutboundSignal, ParsedSignal, UNKNOWN};
use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Values above this are epoch millis, at or below it epoch seconds
pub const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Epoch millis for a raw timestamp of either unit. Missing or
/// non-positive values fall back to `now`.
pub fn normalize_timestamp_millis(timestamp: Option<i64>, now: DateTime<Utc>) -> i64 {
    match timestamp {
        Some(ts) if ts > MILLIS_THRESHOLD => ts,
        Some(ts) if ts > 0 => ts.saturating_mul(1000),
        _ => now.timestamp_millis(),
    }
}

/// Render epoch millis as local wall-clock time
pub fn render_local_time(millis: i64, offset: FixedOffset) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.with_timezone(&offset).format(TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Fixed zone for `hours` east of UTC, UTC if out of range
pub fn zone(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Flatten a scored signal into the always-populated wire record
pub fn to_outbound(signal: &ParsedSignal, offset: FixedOffset, now: DateTime<Utc>) -> OutboundSignal {
    let millis = normalize_timestamp_millis(signal.timestamp, now);
    let (quality, quality_level, quality_details) = match &signal.quality {
        Some(q) => (q.score, q.level.as_str().to_string(), q.details.clone()),
        None => (0, UNKNOWN.to_string(), Vec::new()),
    };

    OutboundSignal {
        id: signal.id.clone(),
        title: format!("【{}】{} 交易信号", signal.author, signal.symbol()),
        author: signal.author.clone(),
        symbol: signal.symbol().to_string(),
        direction: signal.direction.as_str().to_string(),
        entry_price: signal.entry_price().to_string(),
        stop_loss: signal.stop_loss().to_string(),
        target_price: signal.target_price().to_string(),
        leverage: signal.leverage().to_string(),
        position_size: signal
            .position_size
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        trade_type: signal
            .trade_type
            .map(|t| t.as_str())
            .unwrap_or(UNKNOWN)
            .to_string(),
        analysis: signal.analysis.clone().unwrap_or_default(),
        message_time: render_local_time(millis, offset),
        channel: signal.channel.clone(),
        original_link: signal.original_link.clone(),
        message_content: signal.message_content.clone(),
        quality,
        quality_level,
        quality_details,
    }
}
