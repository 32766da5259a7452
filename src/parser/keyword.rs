//! Keyword-chain strategy
//!
//! Last structured attempt before the minimal record. Reads hint and
//! content as one text, decides direction by ordered substring probes and
//! runs its own symbol cascade, independent of the field extractor.

use super::lexicon::DIRECTION_KEYWORDS;
use crate::types::{Direction, TradeType};
use once_cell::sync::Lazy;
use regex::Regex;

static SYMBOL_PROBES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)币种\s*[：:]\s*[#$]?([A-Z0-9]{1,10})(?:[^A-Za-z0-9]|$)").unwrap(),
        Regex::new(r"(?i)[#$]([A-Z][A-Z0-9]{0,9})(?:[^A-Za-z0-9]|$)").unwrap(),
        Regex::new(r"(?:^|[^A-Za-z0-9])([A-Z]{2,10}?)(?:/USDT|USDT|/USD)?(?:[^A-Za-z0-9]|$)").unwrap(),
    ]
});

static ENTRY_PROBES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"入场[价位]*\s*[：:]?\s*([\d.,\-~/附近市价]+)").unwrap(),
        Regex::new(r"价格\s*[：:]?\s*([\d.,\-~]+)").unwrap(),
    ]
});

static STOP_LOSS_PROBE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"止损\s*[：:]?\s*([\d.,]+)").unwrap());

static TARGET_PROBES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"止盈\s*[：:]?\s*([\d.,\-~/]+)").unwrap(),
        Regex::new(r"目标\s*[：:]?\s*([\d.,\-~/<>]+)").unwrap(),
    ]
});

static LEVERAGE_PROBES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"杠杆\s*[：:]?\s*(\d+)\s*倍").unwrap(),
        Regex::new(r"(\d+)\s*倍").unwrap(),
    ]
});

static POSITION_PROBE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"仓位\s*[：:]?\s*(\d+)\s*%").unwrap());

/// Output of the keyword chain; always produced, possibly all empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFields {
    pub symbol: Option<String>,
    pub direction: Direction,
    pub entry_price: Option<String>,
    pub stop_loss: Option<String>,
    pub target_price: Option<String>,
    pub leverage: Option<String>,
    pub position_size: Option<String>,
    pub trade_type: Option<TradeType>,
}

pub fn keyword_chain(hint: Option<&str>, content: Option<&str>) -> KeywordFields {
    let text = format!("{} {}", content.unwrap_or_default(), hint.unwrap_or_default());

    let direction = keyword_direction(&text);
    let leverage = probe(&LEVERAGE_PROBES, &text);

    KeywordFields {
        symbol: probe(&SYMBOL_PROBES, &text).map(|s| s.to_uppercase()),
        direction,
        entry_price: probe(&ENTRY_PROBES, &text),
        stop_loss: probe(std::slice::from_ref(&*STOP_LOSS_PROBE), &text),
        target_price: probe(&TARGET_PROBES, &text),
        position_size: probe(std::slice::from_ref(&*POSITION_PROBE), &text)
            .map(|p| format!("{}%", p)),
        trade_type: infer_trade_type(&text, direction, leverage.is_some()),
        leverage,
    }
}

/// Ordered containment over the keyword table.
///
/// The text is lowercased and "方向: x" is folded to "方向：x" first so
/// the labelled probes see one spelling.
pub fn keyword_direction(text: &str) -> Direction {
    let normalized = normalize_labels(&text.to_lowercase());
    DIRECTION_KEYWORDS
        .iter()
        .find(|(needle, _)| contains_keyword(&normalized, needle))
        .map(|(_, direction)| *direction)
        .unwrap_or(Direction::Unknown)
}

/// Substring match where an ASCII edge of `needle` must sit on an ASCII
/// word boundary, so "long" does not fire inside "belongs"
fn contains_keyword(text: &str, needle: &str) -> bool {
    let is_word = |c: char| c.is_ascii_alphanumeric();
    let starts_ascii = needle.chars().next().is_some_and(is_word);
    let ends_ascii = needle.chars().last().is_some_and(is_word);

    text.match_indices(needle).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + needle.len()..].chars().next();
        !(starts_ascii && before.is_some_and(is_word)) && !(ends_ascii && after.is_some_and(is_word))
    })
}

/// Spot when the text or direction says so, contract when leverage or
/// "合约" appears.
pub fn infer_trade_type(text: &str, direction: Direction, has_leverage: bool) -> Option<TradeType> {
    if text.contains("现货") || direction == Direction::Spot {
        Some(TradeType::Spot)
    } else if has_leverage || text.contains("合约") {
        Some(TradeType::Contract)
    } else {
        None
    }
}

fn normalize_labels(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_colon = false;
    for c in text.chars() {
        let c = if c == ':' { '：' } else { c };
        if after_colon && c.is_whitespace() {
            continue;
        }
        after_colon = c == '：';
        out.push(c);
    }
    out
}

fn probe(rules: &[Regex], text: &str) -> Option<String> {
    rules.iter().find_map(|rule| {
        rule.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty() && s.chars().any(|c| c.is_ascii_alphanumeric() || c == '市'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_direction_first() {
        assert_eq!(keyword_direction("方向: 做空 不要做多"), Direction::Short);
        assert_eq!(keyword_direction("方向：现货"), Direction::Spot);
        assert_eq!(keyword_direction("方向：平仓"), Direction::Close);
    }

    #[test]
    fn test_containment_direction() {
        assert_eq!(keyword_direction("准备多单"), Direction::Long);
        assert_eq!(keyword_direction("Short the bounce"), Direction::Short);
        assert_eq!(keyword_direction("现货拿住"), Direction::Spot);
        assert_eq!(keyword_direction("hello"), Direction::Unknown);
    }

    #[test]
    fn test_ascii_keywords_need_word_boundary() {
        assert_eq!(keyword_direction("it belongs to the AI sector"), Direction::Unknown);
        assert_eq!(keyword_direction("chip shortage, longer wait"), Direction::Unknown);
        assert_eq!(keyword_direction("going LONG here"), Direction::Long);
        assert_eq!(keyword_direction("方向：longer"), Direction::Unknown);
        assert_eq!(keyword_direction("BTC多单"), Direction::Long);

        let fields = keyword_chain(None, Some("NEWCOIN listing soon, it belongs to the AI sector"));
        assert_eq!(fields.symbol.as_deref(), Some("NEWCOIN"));
        assert_eq!(fields.direction, Direction::Unknown);
    }

    #[test]
    fn test_target_ladder_kept() {
        let fields = keyword_chain(None, Some("XYZ 做多 目标：1.2/1.5/1.8"));
        assert_eq!(fields.target_price.as_deref(), Some("1.2/1.5/1.8"));
    }

    #[test]
    fn test_full_keyword_chain() {
        let fields = keyword_chain(
            None,
            Some("NEAR 合约 做多\n入场价：5.2\n止损：4.9\n止盈：6.0\n杠杆：10倍\n仓位：20%"),
        );
        assert_eq!(fields.symbol.as_deref(), Some("NEAR"));
        assert_eq!(fields.direction, Direction::Long);
        assert_eq!(fields.entry_price.as_deref(), Some("5.2"));
        assert_eq!(fields.stop_loss.as_deref(), Some("4.9"));
        assert_eq!(fields.target_price.as_deref(), Some("6.0"));
        assert_eq!(fields.leverage.as_deref(), Some("10"));
        assert_eq!(fields.position_size.as_deref(), Some("20%"));
        assert_eq!(fields.trade_type, Some(TradeType::Contract));
    }

    #[test]
    fn test_symbol_from_uppercase_pair() {
        let fields = keyword_chain(Some("ONDOUSDT 观察"), None);
        assert_eq!(fields.symbol.as_deref(), Some("ONDO"));
    }

    #[test]
    fn test_spot_trade_type() {
        let fields = keyword_chain(None, Some("现货 囤一点"));
        assert_eq!(fields.direction, Direction::Spot);
        assert_eq!(fields.trade_type, Some(TradeType::Spot));
    }

    #[test]
    fn test_nothing_found() {
        let fields = keyword_chain(None, Some("早上好"));
        assert_eq!(fields, KeywordFields::default());
    }
}
