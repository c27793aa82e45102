//! Lenient amount handling for API payloads and workbook cells.

use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::LazyLock;

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseAmount {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Deserialize an amount that may arrive as a number, a numeric string,
/// `null`, or something else entirely. Anything non-numeric becomes `None`.
pub fn loose_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseAmount>::deserialize(deserializer)? {
        Some(LooseAmount::Number(n)) => Some(n),
        Some(LooseAmount::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Some(LooseAmount::Other(_)) | None => None,
    })
}

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]+").expect("valid regex"));

/// Read a currency-formatted string as a signed number.
///
/// Every character outside `[0-9.-]` is stripped before parsing, so
/// `"1,332"` gives `1332` and `"-$250"` gives `-250`.
pub fn parse_signed(text: &str) -> Option<f64> {
    let cleaned = NON_NUMERIC.replace_all(text, "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Like [`parse_signed`] but always positive, so `"$1,234.50"` and
/// `"(-1,234.50)"` both give `1234.5`.
pub fn parse_magnitude(text: &str) -> Option<f64> {
    parse_signed(text).map(f64::abs)
}
