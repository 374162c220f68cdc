//! Literal classification for constant tokens

use crate::model::ValueType;

pub const QUOTE: char = '"';

/// Classify literal text: integer, float, quote-delimited text, else unset
pub fn classify_literal(text: &str) -> ValueType {
    if text.parse::<i64>().is_ok() {
        return ValueType::Integer;
    }
    if is_float(text) {
        return ValueType::Float;
    }
    if is_quoted(text) {
        return ValueType::Text;
    }
    ValueType::Unset
}

/// Digits with an optional sign, fraction and exponent; no "inf" or "NaN"
fn is_float(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && text.parse::<f64>().is_ok()
}

pub fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with(QUOTE) && text.ends_with(QUOTE)
}
