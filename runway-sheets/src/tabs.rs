//! Typed rows for each tab, and the reads other steps depend on.

use anyhow::Result;
use chrono::NaiveDate;
use runway_core::runway::{DAYS_METRIC, LAST_UNTIL_METRIC, YEARS_METRIC};
use runway_core::spending::GRAND_TOTAL_LABEL;
use runway_core::{
    Account, AccountType, AccountTypeSummary, MandatorySpend, RunwayError, RunwayHistoryEntry,
    RunwayResult,
};
use tracing::warn;

use crate::cell::Cell;
use crate::grid::Grid;
use crate::schema::{ACCOUNTS_BY_TYPE, MANDATORY_SPENDING, RUNWAY, RUNWAY_HISTORY};
use crate::workbook::Workbook;

pub fn categorization_rows(accounts: &[Account]) -> Vec<Vec<Cell>> {
    accounts
        .iter()
        .map(|a| {
            vec![
                Cell::text(a.title.clone()),
                a.balance.into(),
                Cell::text(a.account_type.map(|t| t.label()).unwrap_or("")),
            ]
        })
        .collect()
}

pub fn by_type_rows(summaries: &[AccountTypeSummary]) -> Vec<Vec<Cell>> {
    summaries
        .iter()
        .map(|s| vec![Cell::text(s.account_type.clone()), s.total_balance.into()])
        .collect()
}

pub fn spend_rows(spend: &MandatorySpend) -> Vec<Vec<Cell>> {
    spend
        .rows()
        .into_iter()
        .map(|r| vec![Cell::text(r.label), r.annual_amount.into()])
        .collect()
}

pub fn runway_rows(result: &RunwayResult) -> Vec<Vec<Cell>> {
    vec![
        vec![DAYS_METRIC.into(), result.days.into()],
        vec![YEARS_METRIC.into(), Cell::text(result.years_display())],
        vec![LAST_UNTIL_METRIC.into(), result.exhaustion_date.into()],
    ]
}

pub fn history_rows(entries: &[RunwayHistoryEntry]) -> Vec<Vec<Cell>> {
    entries
        .iter()
        .map(|e| {
            vec![
                e.snapshot_date.into(),
                e.runway_days.map(Cell::from).unwrap_or_default(),
                e.exhaustion_date.map(Cell::from).unwrap_or_default(),
            ]
        })
        .collect()
}

/// History entries read back from the tab, plus how many rows were unusable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryRead {
    pub entries: Vec<RunwayHistoryEntry>,
    pub dropped: usize,
}

/// Parse an existing history tab. A missing or empty tab is an empty log.
///
/// Rows are keyed on the date cell alone; native dates and text dates
/// normalize to the same day. Only rows without a readable date are dropped.
/// Missing day counts or exhaustion dates (older two-column rows) stay blank.
pub fn history_from_grid(grid: Option<&Grid>) -> HistoryRead {
    let mut out = HistoryRead::default();
    let Some(grid) = grid else {
        return out;
    };

    for (i, row) in grid.data_rows().iter().enumerate() {
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        let cell = |c: usize| row.get(c).cloned().unwrap_or_default();
        let Some(snapshot_date) = cell(0).as_date() else {
            warn!(line = i + 2, cells = ?row, "dropping undated {} row", RUNWAY_HISTORY.name);
            out.dropped += 1;
            continue;
        };

        let runway_days = cell(1).as_number().map(|n| n.round() as i64);
        let exhaustion_date = cell(2).as_date();
        if (runway_days.is_none() && !cell(1).is_empty())
            || (exhaustion_date.is_none() && !cell(2).is_empty())
        {
            warn!(
                line = i + 2,
                cells = ?row,
                "unreadable {} values left blank",
                RUNWAY_HISTORY.name
            );
        }

        out.entries.push(RunwayHistoryEntry {
            snapshot_date,
            runway_days,
            exhaustion_date,
        });
    }
    out
}

/// Cash on hand: magnitude of the "Cash" balance in "Accounts By Type".
pub fn read_cash_on_hand(wb: &impl Workbook) -> Result<Option<f64>> {
    let cell = wb.lookup_cell(
        ACCOUNTS_BY_TYPE.name,
        AccountType::Cash.label(),
        "Type",
        "Balance",
    )?;
    Ok(cell.as_magnitude())
}

/// Burn rate: magnitude of the grand total in "Mandatory Spending".
pub fn read_burn_rate(wb: &impl Workbook) -> Result<Option<f64>> {
    let cell = wb.lookup_cell(
        MANDATORY_SPENDING.name,
        GRAND_TOTAL_LABEL,
        "Expense Category",
        "Estimated Annual Spend",
    )?;
    Ok(cell.as_magnitude())
}

/// The current runway as recorded in the "Runway" tab: `(days, last_until)`.
pub fn read_runway_snapshot(wb: &impl Workbook) -> Result<(i64, NaiveDate)> {
    let days_cell = wb.lookup_cell(RUNWAY.name, DAYS_METRIC, "Metric", "Value")?;
    let days = days_cell.as_number().ok_or_else(|| {
        RunwayError::Validation(format!(
            "Could not find a valid number for '{DAYS_METRIC}' on the '{}' tab.",
            RUNWAY.name
        ))
    })?;

    let until_cell = wb.lookup_cell(RUNWAY.name, LAST_UNTIL_METRIC, "Metric", "Value")?;
    let until = until_cell.as_date().ok_or_else(|| {
        RunwayError::Validation(format!(
            "Could not find a valid value for '{LAST_UNTIL_METRIC}' on the '{}' tab.",
            RUNWAY.name
        ))
    })?;

    Ok((days.round() as i64, until))
}
