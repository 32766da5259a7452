//! Trading-call parser
//!
//! Turns one raw message into a structured signal through an ordered
//! fallback chain:
//! 1. structured: the publisher's hint, content as backup
//! 2. freeform: content read as if it were the hint
//! 3. keyword chain: substring/keyword probes over everything
//! 4. minimal: symbol and direction unknown, content echoed
//!
//! A message with neither hint nor content is suppressed.

pub mod extract;
pub mod keyword;
pub mod lexicon;


use crate::ingester::RawMessage;
use crate::types::{Direction, ParseStrategy, ParsedSignal, TradeType};
use extract::{extract_fields, ExtractedFields};
use keyword::{infer_trade_type, keyword_chain, KeywordFields};

/// Fields resolved by whichever strategy succeeded
#[derive(Debug, Default)]
struct Resolved {
    symbol: Option<String>,
    direction: Direction,
    entry_price: Option<String>,
    stop_loss: Option<String>,
    target_price: Option<String>,
    leverage: Option<String>,
    position_size: Option<String>,
    trade_type: Option<TradeType>,
}

impl Resolved {
    fn from_fields(fields: ExtractedFields, text: &str) -> Self {
        let trade_type = infer_trade_type(text, fields.direction, fields.leverage.is_some());
        Self {
            symbol: fields.symbol,
            direction: fields.direction,
            entry_price: fields.entry_price,
            stop_loss: fields.stop_loss,
            target_price: fields.target_price,
            leverage: fields.leverage,
            position_size: None,
            trade_type,
        }
    }
}

impl From<KeywordFields> for Resolved {
    fn from(fields: KeywordFields) -> Self {
        Self {
            symbol: fields.symbol,
            direction: fields.direction,
            entry_price: fields.entry_price,
            stop_loss: fields.stop_loss,
            target_price: fields.target_price,
            leverage: fields.leverage,
            position_size: fields.position_size,
            trade_type: fields.trade_type,
        }
    }
}

/// Parse a raw message. `None` means suppressed.
pub fn parse_message(message: &RawMessage) -> Option<ParsedSignal> {
    let hint = message.hint();
    let content = message.content();

    if hint.is_none() && content.is_none() {
        tracing::debug!("Message {} has no hint and no content, suppressed", message.id);
        return None;
    }

    let (resolved, strategy) = run_chain(hint, content);
    tracing::debug!(
        "Message {} parsed via {:?}: symbol={:?} direction={}",
        message.id,
        strategy,
        resolved.symbol,
        resolved.direction
    );

    Some(build_signal(message, resolved, strategy))
}

fn run_chain(hint: Option<&str>, content: Option<&str>) -> (Resolved, ParseStrategy) {
    if let Some(hint) = hint {
        let fields = extract_fields(Some(hint), content);
        if fields.symbol.is_some() {
            let text = joined(Some(hint), content);
            return (Resolved::from_fields(fields, &text), ParseStrategy::Structured);
        }
    }

    if let Some(content) = content {
        let fields = extract_fields(Some(content), None);
        if fields.symbol.is_some() {
            return (Resolved::from_fields(fields, content), ParseStrategy::Freeform);
        }
    }

    let fields = keyword_chain(hint, content);
    if fields.symbol.is_some() {
        return (fields.into(), ParseStrategy::KeywordChain);
    }

    (Resolved::default(), ParseStrategy::Minimal)
}

fn joined(hint: Option<&str>, content: Option<&str>) -> String {
    format!("{}\n{}", hint.unwrap_or_default(), content.unwrap_or_default())
}

fn build_signal(message: &RawMessage, resolved: Resolved, strategy: ParseStrategy) -> ParsedSignal {
    let content = message.message_content.clone().unwrap_or_default();

    ParsedSignal {
        id: message.dedup_key(),
        author: message.author_nickname.clone().unwrap_or_default(),
        platform: message.platform.clone().unwrap_or_default(),
        channel: message.channel_name.clone().unwrap_or_default(),
        timestamp: message.timestamp,
        symbol: resolved.symbol.filter(|s| !s.is_empty()),
        direction: resolved.direction,
        entry_price: resolved.entry_price,
        stop_loss: resolved.stop_loss,
        target_price: resolved.target_price,
        leverage: resolved.leverage,
        position_size: resolved.position_size,
        trade_type: resolved.trade_type,
        analysis: message
            .analysis
            .clone()
            .filter(|a| !a.trim().is_empty()),
        original_content: content.clone(),
        original_link: deep_link(message),
        message_content: content,
        strategy,
        quality: None,
    }
}

/// Link back to the originating chat message, empty when underspecified
pub fn deep_link(message: &RawMessage) -> String {
    let (Some(platform), Some(channel), Some(msg_id)) = (
        message.platform.as_deref().filter(|p| !p.is_empty()),
        message.channel_id.as_deref().filter(|c| !c.is_empty()),
        message.message_id.as_deref().filter(|m| !m.is_empty()),
    ) else {
        return String::new();
    };

    match platform {
        "discord" => format!(
            "https://discord.com/channels/{}/{}/{}",
            message.guild_id.as_deref().unwrap_or("@me"),
            channel,
            msg_id
        ),
        "kook" => format!(
            "https://www.kookapp.cn/app/channels/{}/messages/{}",
            channel, msg_id
        ),
        other => format!("{}://channel/{}/message/{}", other, channel, msg_id),
    }
}
