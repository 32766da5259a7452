//! Signal quality scoring
//!
//! Additive 0-100 score over independent factors:
//! - Completeness: symbol (15), direction (15), entry (10)
//! - Risk control: stop loss (15)
//! - Objective: target price (20)
//! - Rationale: analysis (10)
//! - Leverage sanity: 10 in range, 5 otherwise (never 0)
//! - Source: trusted platform bonus (5)


use crate::parser::lexicon::is_trusted_platform;
use crate::types::{ParsedSignal, QualityAssessment, QualityLevel};

/// Leverage above this is flagged as aggressive
pub const MAX_REASONABLE_LEVERAGE: u32 = 50;

/// Score one parsed signal
pub fn evaluate(signal: &ParsedSignal) -> QualityAssessment {
    let mut score: u32 = 0;
    let mut details = Vec::with_capacity(8);

    let mut factor = |ok: bool, points: u32, pass: &str, fail: &str| {
        if ok {
            score += points;
            details.push(pass.to_string());
        } else {
            details.push(fail.to_string());
        }
    };

    factor(signal.has_symbol(), 15, "Symbol identified", "Symbol missing");
    factor(signal.direction.is_known(), 15, "Direction clear", "Direction unclear");
    factor(signal.entry_price.is_some(), 10, "Entry price given", "Entry price unspecified");
    factor(present(&signal.stop_loss), 15, "Stop loss set", "No stop loss");
    factor(present(&signal.target_price), 20, "Target price set", "No target price");
    factor(present(&signal.analysis), 10, "Analysis included", "No analysis");

    match signal.leverage.as_deref().filter(|l| !l.trim().is_empty()) {
        Some(raw) => match parse_leverage(raw) {
            Some(lev) if lev > 0 && lev <= MAX_REASONABLE_LEVERAGE => {
                score += 10;
                details.push(format!("Leverage {}x reasonable", lev));
            }
            _ => {
                score += 5;
                details.push(format!("Leverage {} aggressive or unreadable", raw));
            }
        },
        None => {
            score += 5;
            details.push("Leverage not given (optional)".to_string());
        }
    }

    if is_trusted_platform(&signal.platform) {
        score += 5;
        details.push(format!("Trusted platform: {}", signal.platform));
    }

    let score = score.min(100) as u8;
    QualityAssessment {
        score,
        level: QualityLevel::from_score(score),
        details,
    }
}

/// Score and attach the assessment to the signal
pub fn assess(mut signal: ParsedSignal) -> ParsedSignal {
    signal.quality = Some(evaluate(&signal));
    signal
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Digits of "10", "10x", "x10", "10倍"
fn parse_leverage(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
