//! Daily refresh: accounts → spending → runway → history.
//!
//! Account and spending failures abort the run. Runway and history failures
//! are logged and recorded in the report; history still runs after a failed
//! runway step and reads whatever the Runway tab holds.

use anyhow::Result;
use chrono::NaiveDate;
use runway_core::{ClassificationRules, RunwayError, RunwayResult, SpendConfig};
use runway_sheets::Workbook;
use serde::Serialize;
use std::fmt;
use tracing::{error, info};

use crate::pocketsmith::FinanceApi;
use crate::steps::{self, AccountsOutcome, HistoryOutcome, SpendOutcome};

/// Explicit inputs for one run, built once at startup.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub rules: ClassificationRules,
    pub spend: SpendConfig,
    /// Today's date in the workbook time zone
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Accounts,
    MandatorySpending,
    Runway,
    History,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::Accounts => "accounts",
            Step::MandatorySpending => "mandatory-spending",
            Step::Runway => "runway",
            Step::History => "history",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum StepStatus {
    Ok,
    Failed { kind: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    #[serde(flatten)]
    pub status: StepStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_date: NaiveDate,
    pub steps: Vec<StepReport>,
    pub accounts: Option<AccountsOutcome>,
    pub spending: Option<SpendOutcome>,
    pub runway: Option<RunwayResult>,
    pub history: Option<HistoryOutcome>,
}

impl RunReport {
    fn new(run_date: NaiveDate) -> Self {
        Self {
            run_date,
            steps: Vec::new(),
            accounts: None,
            spending: None,
            runway: None,
            history: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::Ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.status != StepStatus::Ok)
    }

    fn record<T>(&mut self, step: Step, result: Result<T>) -> Option<T> {
        match result {
            Ok(v) => {
                self.steps.push(StepReport { step, status: StepStatus::Ok });
                Some(v)
            }
            Err(e) => {
                error!(%step, error = %format!("{e:#}"), "step failed");
                self.steps.push(StepReport {
                    step,
                    status: StepStatus::Failed {
                        kind: error_kind(&e).to_string(),
                        message: format!("{e:#}"),
                    },
                });
                None
            }
        }
    }
}

/// Domain kind of an error anywhere in its chain, or "internal".
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|e| e.downcast_ref::<RunwayError>())
        .map(RunwayError::kind)
        .unwrap_or("internal")
}

pub async fn refresh(
    api: &impl FinanceApi,
    wb: &mut impl Workbook,
    ctx: &RunContext,
) -> Result<RunReport> {
    info!(today = %ctx.today, "starting data refresh");
    let mut report = RunReport::new(ctx.today);

    let accounts = steps::update_accounts(api, wb, &ctx.rules)
        .await
        .inspect_err(|e| {
            error!(error = %format!("{e:#}"), "error fetching or processing accounts")
        })?;
    report.steps.push(StepReport { step: Step::Accounts, status: StepStatus::Ok });
    report.accounts = Some(accounts);

    let spending = steps::update_mandatory_spending(api, wb, &ctx.spend, ctx.today)
        .await
        .inspect_err(|e| error!(error = %format!("{e:#}"), "error updating mandatory spending"))?;
    report.steps.push(StepReport { step: Step::MandatorySpending, status: StepStatus::Ok });
    report.spending = Some(spending);

    let runway = steps::update_runway(wb, ctx.today);
    report.runway = report.record(Step::Runway, runway);

    let history = steps::update_history(wb, ctx.today);
    report.history = report.record(Step::History, history);

    info!(success = report.is_success(), "refresh complete");
    Ok(report)
}
