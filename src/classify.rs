//! Tolerant numeric classification of single values.
//!
//! A value counts as numeric when its text form, with everything except
//! digits, `.` and `-` removed, parses to a finite number. This accepts
//! currency and unit decorations (`"$10"`, `"12 kg"`) and also some
//! arithmetically wrong inputs (`"$-12.50"` reads as `-12.5`). That
//! permissiveness is part of the contract.

use crate::data::Scalar;

/// Keep only ASCII digits, `.` and `-`.
pub fn strip_numeric(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Extract a number from a scalar using the strip-then-parse rule.
/// Missing values and nulls never produce a number.
pub fn coerce_number(value: Option<&Scalar>) -> Option<f64> {
    match value {
        Some(scalar) if !scalar.is_null() => normalize_price(&scalar.to_text()),
        _ => None,
    }
}

pub fn is_numeric(value: Option<&Scalar>) -> bool {
    coerce_number(value).is_some()
}

/// Parse a human-entered price such as `"$1,299.00"`.
///
/// Empty input, lone signs/points and malformed sequences such as `"1-2"`
/// or `"1..2"` yield `None`.
pub fn normalize_price(text: &str) -> Option<f64> {
    // f64's grammar over [0-9.-] is exactly -?(d+(.d*)?|.d+)
    strip_numeric(text)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
