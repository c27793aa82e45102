//! runway-finance: PocketSmith retrieval and the daily refresh pipeline

pub mod fetch;
pub mod pipeline;
pub mod pocketsmith;
pub mod steps;

pub use fetch::{fetch_all_transactions, TransactionFetch};
pub use pipeline::{refresh, RunContext, RunReport, Step, StepStatus};
pub use pocketsmith::{Credentials, FinanceApi, PocketsmithClient, TransactionQuery};
