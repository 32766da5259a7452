//! Bilingual keyword tables
//!
//! Read-only, process-wide. Everything here is static data; the regexes
//! built from it live next to the strategies that use them.

use crate::types::Direction;

/// Direction tokens (lowercased) and the side they map to
pub const DIRECTION_TOKENS: &[(&str, Direction)] = &[
    ("多头", Direction::Long),
    ("做多", Direction::Long),
    ("看涨", Direction::Long),
    ("多单", Direction::Long),
    ("上方", Direction::Long),
    ("涨", Direction::Long),
    ("long", Direction::Long),
    ("buy", Direction::Long),
    ("up", Direction::Long),
    ("^", Direction::Long),
    ("⬆", Direction::Long),
    ("空头", Direction::Short),
    ("做空", Direction::Short),
    ("看跌", Direction::Short),
    ("空单", Direction::Short),
    ("下方", Direction::Short),
    ("跌", Direction::Short),
    ("short", Direction::Short),
    ("sell", Direction::Short),
    ("down", Direction::Short),
    ("↓", Direction::Short),
    ("⬇", Direction::Short),
];

/// Position-state tokens accepted in a labelled direction value
pub const STATE_TOKENS: &[(&str, Direction)] = &[
    ("现货", Direction::Spot),
    ("spot", Direction::Spot),
    ("平仓", Direction::Close),
    ("close", Direction::Close),
];

/// Ordered containment probes for the keyword chain.
///
/// Labelled forms come first so "方向：做空" wins over a stray "做多"
/// elsewhere in the text.
pub const DIRECTION_KEYWORDS: &[(&str, Direction)] = &[
    ("方向：多单", Direction::Long),
    ("方向：做多", Direction::Long),
    ("方向：long", Direction::Long),
    ("方向：空单", Direction::Short),
    ("方向：做空", Direction::Short),
    ("方向：short", Direction::Short),
    ("方向：现货", Direction::Spot),
    ("方向：平仓", Direction::Close),
    ("做多", Direction::Long),
    ("多单", Direction::Long),
    ("long", Direction::Long),
    ("做空", Direction::Short),
    ("空单", Direction::Short),
    ("short", Direction::Short),
    ("现货", Direction::Spot),
];

/// Known tickers, matched as whole tokens (case-insensitively unless listed
/// in `COMMON_WORD_SYMBOLS`)
pub const KNOWN_SYMBOLS: &[&str] = &[
    "BTC", "ETH", "SOL", "BNB", "ADA", "DOGE", "XRP", "DOT", "UNI", "LTC", "MATIC", "AVAX",
    "SHIB", "TRX", "LINK", "XLM", "TON", "NEAR", "ICP", "BSV", "EOS", "XMR", "DASH", "ZEC",
    "ETC", "BCH", "FIL", "ALGO", "ATOM", "MANA", "SAND", "AXS", "CHZ", "FTM", "TRB", "AAVE",
    "MKR", "COMP", "SNX", "DYDX", "CRV", "APE", "APT", "INJ", "RDNT", "JTO", "PYTH", "TIA",
    "FET", "RNDR", "WIF", "ORBS", "PEPE", "FLOKI", "ELON", "BONK", "HNT", "IMX", "MINA",
    "TOMO", "REN", "GRT", "OMG", "ZRX", "KNC", "BAT", "NEO", "QTUM", "ONT", "IOTA", "THETA",
    "VET", "EGLD", "KSM", "DODO", "RUNE", "CRPT", "SXP", "AKRO", "CTXC", "DENT", "REEF",
    "SUSHI", "YFI", "1INCH", "CELR", "STX", "RVN", "DGB", "HBAR", "XEM", "HOT", "LSK", "ARDR",
    "SC", "ZIL", "STRK", "BLUR", "SEI", "OP", "ARB", "BASE", "ZKS", "BNX", "AGIX", "LOOM",
    "CHR", "PERP", "GALA", "AXL", "OCEAN", "PIXEL", "STMX", "HFT", "CHESS", "HIFI", "SYS",
    "XNO", "AR", "FLUX", "TURBO", "NTRN", "ZETA", "ALT", "SAGA", "JUP", "WLD",
];

/// Known tickers that are also everyday English words
pub const COMMON_WORD_SYMBOLS: &[&str] = &[
    "NEAR", "HOT", "ALT", "BASE", "OP", "AR", "SC", "DOT", "LINK", "TON", "APE", "BAT", "SAND",
    "DENT", "REEF", "BLUR", "PERP", "CHESS", "FLUX", "TURBO", "SAGA", "OCEAN", "COMP", "UNI",
    "ELON", "REN",
];

/// Platforms whose messages earn the source bonus
pub const TRUSTED_PLATFORMS: &[&str] = &["discord", "kook"];

/// Literal for "enter at market"
pub const MARKET_PRICE_LITERAL: &str = "市价";

/// Look up a single direction token
pub fn direction_for(token: &str) -> Option<Direction> {
    let token = token.trim().to_lowercase();
    DIRECTION_TOKENS
        .iter()
        .chain(STATE_TOKENS)
        .find(|(t, _)| *t == token)
        .map(|(_, d)| *d)
}

pub fn is_common_word(symbol: &str) -> bool {
    COMMON_WORD_SYMBOLS.contains(&symbol)
}

pub fn is_trusted_platform(platform: &str) -> bool {
    TRUSTED_PLATFORMS.contains(&platform.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_tokens_map_to_one_side() {
        for (token, direction) in DIRECTION_TOKENS {
            assert!(
                matches!(direction, Direction::Long | Direction::Short),
                "{} maps outside long/short",
                token
            );
            assert_eq!(direction_for(token), Some(*direction));
        }
    }

    #[test]
    fn test_direction_lookup_is_case_insensitive() {
        assert_eq!(direction_for("LONG"), Some(Direction::Long));
        assert_eq!(direction_for(" Short "), Some(Direction::Short));
        assert_eq!(direction_for("现货"), Some(Direction::Spot));
        assert_eq!(direction_for("平仓"), Some(Direction::Close));
        assert_eq!(direction_for("sideways"), None);
    }

    #[test]
    fn test_known_symbols_are_unique_and_uppercase() {
        let mut seen = std::collections::HashSet::new();
        for symbol in KNOWN_SYMBOLS {
            assert_eq!(*symbol, symbol.to_uppercase());
            assert!(seen.insert(*symbol), "duplicate ticker {}", symbol);
        }
    }

    #[test]
    fn test_common_word_symbols_are_known() {
        for symbol in COMMON_WORD_SYMBOLS {
            assert!(KNOWN_SYMBOLS.contains(symbol), "{} not a known ticker", symbol);
        }
        assert!(is_common_word("NEAR"));
        assert!(!is_common_word("BTC"));
    }

    #[test]
    fn test_trusted_platforms() {
        assert!(is_trusted_platform("discord"));
        assert!(is_trusted_platform("KOOK"));
        assert!(!is_trusted_platform("telegram"));
    }
}
