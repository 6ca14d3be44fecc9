//! Shift-hours normalization.
//!
//! Quota lines and roster records carry weekly hours as numbers or as
//! free text typed by people ("40", "40,0", "44h"). Matching compares
//! the normalized token, so every representation of the same value
//! must collapse to one string:
//!   - absent, blank, non-finite or unparseable → `N/A`
//!   - the number zero → `N/A`; the text "0" stays `0`
//!   - otherwise the shortest decimal form of the parsed value,
//!     whole numbers without a fractional part.

use crate::types::UNKNOWN_HOURS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weekly hours as they arrive from the source tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HoursValue {
    Number(f64),
    Text(String),
}

impl From<f64> for HoursValue {
    fn from(n: f64) -> Self {
        HoursValue::Number(n)
    }
}

impl From<&str> for HoursValue {
    fn from(s: &str) -> Self {
        HoursValue::Text(s.to_string())
    }
}

/// Canonical hours token. Ordering is plain string ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HoursToken(String);

impl HoursToken {
    pub fn unknown() -> Self {
        HoursToken(UNKNOWN_HOURS.to_string())
    }

    /// Sorts before every real token; used as a range floor.
    pub(crate) fn lowest() -> Self {
        HoursToken(String::new())
    }

    pub fn is_known(&self) -> bool {
        self.0 != UNKNOWN_HOURS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The token as an optional display value (`None` for `N/A`).
    pub fn known(&self) -> Option<&str> {
        self.is_known().then_some(self.0.as_str())
    }
}

impl fmt::Display for HoursToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize an optional hours value into its matching token.
pub fn normalize_hours(value: Option<&HoursValue>) -> HoursToken {
    match value {
        None => HoursToken::unknown(),
        // A numeric zero is an unset cell in the source tables.
        Some(HoursValue::Number(n)) if *n == 0.0 => HoursToken::unknown(),
        Some(HoursValue::Number(n)) => from_number(*n),
        Some(HoursValue::Text(s)) => normalize_text(s),
    }
}

/// Normalize a textual hours value. Feeding a token back in returns it
/// unchanged.
pub fn normalize_text(raw: &str) -> HoursToken {
    let replaced = raw.trim().replacen(',', ".", 1);
    match leading_number(&replaced).and_then(|s| s.parse::<f64>().ok()) {
        Some(n) => from_number(n),
        None => HoursToken::unknown(),
    }
}

fn from_number(n: f64) -> HoursToken {
    if !n.is_finite() {
        return HoursToken::unknown();
    }
    // f64's Display is the shortest string that round-trips, and prints
    // whole numbers without a fractional part.
    HoursToken(format!("{n}"))
}

/// The longest prefix of `s` that reads as a decimal number
/// (`[+-]digits[.digits][e[+-]digits]`), if it contains any digit.
fn leading_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        // A bare trailing dot is not part of the number.
        if frac_end > frac_start {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    Some(&s[..end])
}
