//! Runway: how long cash on hand lasts at the mandatory burn rate.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RunwayError};

pub const DAYS_METRIC: &str = "Runway (Days)";
pub const YEARS_METRIC: &str = "Runway (Years)";
pub const LAST_UNTIL_METRIC: &str = "Last Until";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunwayResult {
    pub cash_on_hand: f64,
    /// Annual mandatory spend
    pub burn_rate: f64,
    /// Unrounded `cash_on_hand / burn_rate`
    pub years: f64,
    pub days: i64,
    pub exhaustion_date: NaiveDate,
}

impl RunwayResult {
    /// Years rounded half away from zero to one decimal place, e.g. `"3.7"`.
    pub fn years_display(&self) -> String {
        format!("{:.1}", (self.years * 10.0).round() / 10.0)
    }
}

/// Compute runway from looked-up inputs.
///
/// Both inputs must be present and finite, and the burn rate strictly positive.
pub fn compute_runway(
    cash_on_hand: Option<f64>,
    burn_rate: Option<f64>,
    today: NaiveDate,
) -> Result<RunwayResult> {
    let (cash, burn) = match (cash_on_hand, burn_rate) {
        (Some(c), Some(b)) if c.is_finite() && b.is_finite() && b > 0.0 => (c, b),
        _ => {
            return Err(RunwayError::Validation(format!(
                "Cash: {}, Burn Rate: {}. Ensure Cash is a number and Burn Rate is positive.",
                show(cash_on_hand),
                show(burn_rate)
            )));
        }
    };

    let years = cash / burn;
    let days_f = (365.0 * years).round();
    if !days_f.is_finite() || days_f.abs() > i64::MAX as f64 {
        return Err(RunwayError::Validation(format!("runway of {days_f} days is out of range")));
    }
    let days = days_f as i64;
    let exhaustion_date = add_days(today, days)
        .ok_or_else(|| {
            RunwayError::Validation(format!("runway of {days} days overflows the calendar"))
        })?;

    Ok(RunwayResult {
        cash_on_hand: cash,
        burn_rate: burn,
        years,
        days,
        exhaustion_date,
    })
}

fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

fn show(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    #[test]
    fn test_three_point_six_five_years() {
        let r = compute_runway(Some(36500.0), Some(10000.0), today()).unwrap();
        assert_eq!(r.years, 3.65);
        assert_eq!(r.days, 1332);
        assert_eq!(r.years_display(), "3.7");
        assert_eq!(r.exhaustion_date, NaiveDate::from_ymd_opt(2030, 6, 8).unwrap());
    }

    #[test]
    fn test_days_use_unrounded_years() {
        // 1.04 years would display as "1.0" but days come from the exact ratio
        let r = compute_runway(Some(10400.0), Some(10000.0), today()).unwrap();
        assert_eq!(r.years_display(), "1.0");
        assert_eq!(r.days, 380);
    }

    #[test]
    fn test_days_match_formula() {
        for (cash, burn) in [(1.0, 3.0), (20000.0, 19999.0), (0.0, 500.0), (123456.78, 4321.0)] {
            let r = compute_runway(Some(cash), Some(burn), today()).unwrap();
            assert_eq!(r.days, (365.0 * cash / burn).round() as i64);
        }
    }

    #[test]
    fn test_zero_cash_runs_out_today() {
        let r = compute_runway(Some(0.0), Some(500.0), today()).unwrap();
        assert_eq!(r.days, 0);
        assert_eq!(r.exhaustion_date, today());
    }

    #[test]
    fn test_rejects_non_positive_burn() {
        for burn in [0.0, -10.0] {
            let err = compute_runway(Some(1000.0), Some(burn), today()).unwrap_err();
            assert!(matches!(err, RunwayError::Validation(_)));
        }
    }

    #[test]
    fn test_rejects_missing_or_non_finite() {
        assert!(compute_runway(None, Some(100.0), today()).is_err());
        assert!(compute_runway(Some(100.0), None, today()).is_err());
        assert!(compute_runway(Some(f64::NAN), Some(100.0), today()).is_err());
        assert!(compute_runway(Some(f64::INFINITY), Some(100.0), today()).is_err());
        let msg = compute_runway(None, Some(100.0), today()).unwrap_err().to_string();
        assert!(msg.contains("Cash: null"), "{msg}");
    }
}
