//! Per-field extraction strategies
//!
//! Each field owns an ordered list of patterns. Patterns are tried in
//! order; each pattern is tried against every text source (hint first,
//! then content) before moving on, and the first capture wins. Labelled
//! patterns sit ahead of loose ones.

use super::lexicon::{self, KNOWN_SYMBOLS};
use crate::types::Direction;
use once_cell::sync::Lazy;
use regex::Regex;

/// A price, a range or a `/`-separated ladder of prices, optionally
/// `$`-prefixed and followed by a qualifier such as 附近
const PRICE: &str =
    r"(\$?\d[\d.,]*(?:\s*[-~～/、]\s*\$?\d[\d.,]*)*(?:\s*(?:附近|左右|一线|上下))?)";

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid pattern {}: {}", p, e)))
        .collect()
}

fn with_price(pattern: &str) -> String {
    pattern.replace("{PRICE}", PRICE)
}

static SYMBOL_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    let (words, tickers): (Vec<&str>, Vec<&str>) = KNOWN_SYMBOLS
        .iter()
        .copied()
        .partition(|s| lexicon::is_common_word(s));
    // tickers that double as English words only count when written uppercase
    let known = format!(
        r"(?i)(?:^|[^A-Za-z0-9])({})(?:[^A-Za-z0-9]|$)",
        tickers.join("|")
    );
    let known_words = format!(
        r"(?:^|[^A-Za-z0-9])({})(?:[^A-Za-z0-9]|$)",
        words.join("|")
    );
    let mut rules = compile(&[
        // 币种：BTC / 交易对：BTC/USDT
        r"(?:币种|交易对)\s*[：:]\s*[#$]?([A-Za-z0-9]+)",
        // $BTC/USDT
        r"\$([A-Za-z0-9]*[A-Za-z][A-Za-z0-9]*)/",
        // $BTC
        r"\$([A-Za-z0-9]*[A-Za-z][A-Za-z0-9]*)",
        // #BTC
        r"#([A-Za-z0-9]*[A-Za-z][A-Za-z0-9]*)(?:\s|$)",
        // BTC 多头 / BTC long
        r"(?:^|[^A-Za-z0-9])([A-Z][A-Z0-9]{1,9})\s*(?:多头|空头|做多|做空|多单|空单|(?i:long|short))",
    ]);
    rules.extend(compile(&[known.as_str(), known_words.as_str()]));
    rules
});

static DIRECTION_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:方向|多空|立场)\s*[：:]\s*([^\n]+)",
        r"(?i)(多头|空头|做多|做空|看涨|看跌|多单|空单)|(?:^|[^a-z])(long|short|buy|sell|up|down)(?:[^a-z]|$)",
        r"(上方|下方)",
        r"(\^|↓|⬆|⬇)",
    ])
});

static ENTRY_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        &with_price(r"(?:入场|进场|开仓)[价位点]*\s*[：:]\s*(?:{PRICE}|(市价))"),
        &with_price(r"(?i)entry(?:\s*price)?\s*[：:]?\s*{PRICE}"),
        r"(市价)",
        r"(\d[\d.]*)\s*(?:入场|进场|建仓)",
        &with_price(r"(?:建仓|买入|卖出)\s*[：:]?\s*{PRICE}"),
    ])
});

static STOP_LOSS_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        &with_price(r"止损(?:价|点|位|设置)?\s*[：:]?\s*{PRICE}"),
        &with_price(r"(?i)(?:stop[\s-]*loss|(?:^|[^a-z])sl)\s*[：:]?\s*{PRICE}"),
    ])
});

static TARGET_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        &with_price(r"(?:目标(?:价|点|位)?|止盈)\s*[：:]?\s*{PRICE}"),
        &with_price(r"(?i)(?:target|take[\s-]*profit|(?:^|[^a-z])tp\d?)\s*[：:]?\s*{PRICE}"),
    ])
});

static LEVERAGE_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:杠杆|倍率)\s*[：:]?\s*[xX]?(\d+)",
        r"(?i)leverage\s*[：:]?\s*x?(\d+)",
        r"(?i)(?:^|[^a-z0-9])(\d{1,3})\s*(?:x|倍)(?:[^a-z0-9]|$)",
    ])
});

/// Fields pulled from one message, `None` where nothing matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub symbol: Option<String>,
    pub direction: Direction,
    pub entry_price: Option<String>,
    pub stop_loss: Option<String>,
    pub target_price: Option<String>,
    pub leverage: Option<String>,
}

/// Run every field's strategy list over the given sources
pub fn extract_fields(hint: Option<&str>, content: Option<&str>) -> ExtractedFields {
    let sources: Vec<&str> = [hint, content]
        .into_iter()
        .flatten()
        .filter(|t| !t.trim().is_empty())
        .collect();

    ExtractedFields {
        symbol: extract_symbol(&sources),
        direction: extract_direction(&sources),
        entry_price: first_match(&ENTRY_RULES, &sources).map(clean_price),
        stop_loss: first_match(&STOP_LOSS_RULES, &sources).map(clean_price),
        target_price: first_match(&TARGET_RULES, &sources).map(clean_price),
        leverage: first_match(&LEVERAGE_RULES, &sources),
    }
}

pub fn extract_symbol(sources: &[&str]) -> Option<String> {
    first_match(&SYMBOL_RULES, sources).map(|s| s.to_uppercase())
}

pub fn extract_direction(sources: &[&str]) -> Direction {
    match first_match(&DIRECTION_RULES, sources) {
        Some(token) => resolve_direction(&token),
        None => Direction::Unknown,
    }
}

/// Map a direction token or a labelled value to a direction.
///
/// A labelled value like "做多 (轻仓)" is not a table token; it is
/// rescanned with the loose rules before giving up.
pub fn resolve_direction(value: &str) -> Direction {
    if let Some(direction) = lexicon::direction_for(value) {
        return direction;
    }

    let inner = DIRECTION_RULES[1..]
        .iter()
        .find_map(|rule| capture(rule, value))
        .and_then(|token| lexicon::direction_for(&token));

    match inner {
        Some(direction) => direction,
        None => {
            tracing::debug!("Unmapped direction token {:?}, using unknown", value);
            Direction::Unknown
        }
    }
}

/// First-success combinator: rules in order, each over every source
pub fn first_match(rules: &[Regex], sources: &[&str]) -> Option<String> {
    rules
        .iter()
        .find_map(|rule| sources.iter().find_map(|text| capture(rule, text)))
}

/// First non-empty capture group of the leftmost match
fn capture(rule: &Regex, text: &str) -> Option<String> {
    let caps = rule.captures(text)?;
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str().trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn clean_price(raw: String) -> String {
    raw.trim_end_matches(['.', ',']).to_string()
}
