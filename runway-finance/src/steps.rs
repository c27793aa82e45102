//! The four refresh steps. Each reads and writes whole tabs.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use runway_core::{
    classify_accounts, compute_runway, mandatory_subtotal, record_snapshot, summarize_by_type,
    Account, AccountTypeSummary, ClassificationRules, MandatorySpend, RunwayHistoryEntry,
    RunwayResult, SpendConfig,
};
use runway_sheets::schema::{
    ACCOUNTS_BY_TYPE, ACCOUNT_CATEGORIZATION, MANDATORY_SPENDING, RUNWAY, RUNWAY_HISTORY,
};
use runway_sheets::{tabs, Workbook};
use serde::Serialize;
use tracing::info;

use crate::fetch::fetch_all_transactions;
use crate::pocketsmith::{FinanceApi, TransactionQuery};

#[derive(Debug, Clone, Serialize)]
pub struct AccountsOutcome {
    pub accounts: Vec<Account>,
    pub by_type: Vec<AccountTypeSummary>,
}

/// Fetch, classify and group accounts; writes "Account Categorization" and
/// "Accounts By Type".
pub async fn update_accounts(
    api: &impl FinanceApi,
    wb: &mut impl Workbook,
    rules: &ClassificationRules,
) -> Result<AccountsOutcome> {
    let raw = api.accounts().await.context("fetching accounts")?;
    let accounts = classify_accounts(&raw, rules);
    wb.write_tab(&ACCOUNT_CATEGORIZATION, tabs::categorization_rows(&accounts))?;

    let by_type = summarize_by_type(&accounts);
    wb.write_tab(&ACCOUNTS_BY_TYPE, tabs::by_type_rows(&by_type))?;

    info!(
        accounts = accounts.len(),
        groups = by_type.len(),
        "updated categorized and grouped account tabs"
    );
    Ok(AccountsOutcome { accounts, by_type })
}

#[derive(Debug, Clone, Serialize)]
pub struct SpendOutcome {
    pub spend: MandatorySpend,
    pub transactions: usize,
    pub stopped_early: Option<String>,
}

/// Fetch the trailing year of debits and write "Mandatory Spending".
pub async fn update_mandatory_spending(
    api: &impl FinanceApi,
    wb: &mut impl Workbook,
    config: &SpendConfig,
    today: NaiveDate,
) -> Result<SpendOutcome> {
    let query = TransactionQuery::trailing_year(today);
    let fetch = fetch_all_transactions(api, &query).await;
    if fetch.transactions.is_empty() {
        info!("no transactions in range, writing manual estimates only");
    }

    let subtotal = mandatory_subtotal(&fetch.transactions, config);
    let spend = MandatorySpend::assemble(subtotal, config);
    wb.write_tab(&MANDATORY_SPENDING, tabs::spend_rows(&spend))?;

    info!(
        transactions = fetch.transactions.len(),
        grand_total = spend.grand_total,
        "updated mandatory spending tab"
    );
    Ok(SpendOutcome {
        spend,
        transactions: fetch.transactions.len(),
        stopped_early: fetch.stopped_early,
    })
}

/// Read cash and burn rate from their tabs and write "Runway".
pub fn update_runway(wb: &mut impl Workbook, today: NaiveDate) -> Result<RunwayResult> {
    let cash = tabs::read_cash_on_hand(&*wb)?;
    let burn = tabs::read_burn_rate(&*wb)?;
    let result = compute_runway(cash, burn, today)?;
    wb.write_tab(&RUNWAY, tabs::runway_rows(&result))?;

    info!(
        days = result.days,
        years = %result.years_display(),
        until = %result.exhaustion_date,
        "runway calculated"
    );
    Ok(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryOutcome {
    pub snapshot_date: NaiveDate,
    pub runway_days: i64,
    pub exhaustion_date: NaiveDate,
    pub entries: usize,
    pub dropped: usize,
}

/// Upsert today's row from the "Runway" tab into "Runway History".
pub fn update_history(wb: &mut impl Workbook, today: NaiveDate) -> Result<HistoryOutcome> {
    let (runway_days, exhaustion_date) = tabs::read_runway_snapshot(&*wb)?;
    let snapshot = RunwayHistoryEntry::new(today, runway_days, exhaustion_date);

    let existing = wb.read_tab(RUNWAY_HISTORY.name)?;
    let read = tabs::history_from_grid(existing.as_ref());
    let entries = record_snapshot(read.entries, snapshot);
    wb.write_tab(&RUNWAY_HISTORY, tabs::history_rows(&entries))?;

    info!(entries = entries.len(), "runway history updated");
    Ok(HistoryOutcome {
        snapshot_date: today,
        runway_days,
        exhaustion_date,
        entries: entries.len(),
        dropped: read.dropped,
    })
}
