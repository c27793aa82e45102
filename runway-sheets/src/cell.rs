//! Cell values and the number formats applied when a tab is written.

use chrono::NaiveDate;
use runway_core::amount::{parse_magnitude, parse_signed};
use runway_core::time::{format_iso, parse_sheet_date};
use serde::{Deserialize, Serialize};

/// A single workbook value. Backends that only store text hand back `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() { Cell::Empty } else { Cell::Text(s) }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty) || matches!(self, Cell::Text(s) if s.trim().is_empty())
    }

    /// Strict key comparison used by header lookups.
    pub fn matches_key(&self, key: &str) -> bool {
        match self {
            Cell::Text(s) => s == key,
            Cell::Empty => key.is_empty(),
            _ => false,
        }
    }

    /// Absolute numeric value; currency-formatted text is cleaned first.
    pub fn as_magnitude(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(n.abs()),
            Cell::Text(s) => parse_magnitude(s),
            _ => None,
        }
    }

    /// Signed numeric value; currency-formatted text is cleaned first.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => parse_signed(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_sheet_date(s),
            _ => None,
        }
    }

    /// Render for a text backend under the column's format.
    pub fn render(&self, format: ColumnFormat) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Date(d) => format_iso(*d),
            Cell::Number(n) => match format {
                ColumnFormat::Fixed2 => format!("{n:.2}"),
                ColumnFormat::Integer => format!("{:.0}", n.round()),
                ColumnFormat::General | ColumnFormat::IsoDate => n.to_string(),
            },
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Cell::Date(d)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::text(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::text(s)
    }
}

/// Number format for a column's data rows; the header is never formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnFormat {
    General,
    /// `0.00`
    Fixed2,
    /// `0`
    Integer,
    /// `yyyy-MM-dd`
    IsoDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_formats() {
        assert_eq!(Cell::Number(5000.0).render(ColumnFormat::Fixed2), "5000.00");
        assert_eq!(Cell::Number(18600.0 / 365.0).render(ColumnFormat::Fixed2), "50.96");
        assert_eq!(Cell::Number(1332.0).render(ColumnFormat::Integer), "1332");
        assert_eq!(Cell::Number(1332.0).render(ColumnFormat::General), "1332");
        assert_eq!(Cell::Number(12.25).render(ColumnFormat::General), "12.25");
        let d = NaiveDate::from_ymd_opt(2030, 6, 8).unwrap();
        assert_eq!(Cell::Date(d).render(ColumnFormat::IsoDate), "2030-06-08");
        assert_eq!(Cell::text("3.7").render(ColumnFormat::Fixed2), "3.7");
        assert_eq!(Cell::Empty.render(ColumnFormat::Fixed2), "");
    }

    #[test]
    fn test_coercions() {
        assert_eq!(Cell::text("$36,500.00").as_magnitude(), Some(36500.0));
        assert_eq!(Cell::Number(-10000.0).as_magnitude(), Some(10000.0));
        assert_eq!(Cell::text("abc").as_magnitude(), None);
        assert_eq!(Cell::Empty.as_magnitude(), None);
        assert_eq!(Cell::text(" 1332 ").as_number(), Some(1332.0));
        assert_eq!(Cell::text("1,332").as_number(), Some(1332.0));
        assert_eq!(Cell::text("-$250").as_number(), Some(-250.0));
        assert_eq!(Cell::text("2026-10-15").as_date(), NaiveDate::from_ymd_opt(2026, 10, 15));
        assert_eq!(Cell::Number(46000.0).as_date(), None);
    }

    #[test]
    fn test_key_match_is_exact() {
        assert!(Cell::text("Cash").matches_key("Cash"));
        assert!(!Cell::text("cash").matches_key("Cash"));
        assert!(!Cell::text("Cash ").matches_key("Cash"));
        assert!(!Cell::Number(1.0).matches_key("1"));
    }
}
