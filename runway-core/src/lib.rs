//! runway-core: domain types and the pure steps of the runway pipeline

pub mod account;
pub mod aggregate;
pub mod amount;
pub mod error;
pub mod history;
pub mod runway;
pub mod spending;
pub mod time;

pub use account::{
    classify_accounts, Account, AccountType, ClassificationRules, RawAccount, UNCATEGORIZED,
};
pub use aggregate::{summarize_by_type, AccountTypeSummary};
pub use error::RunwayError;
pub use history::{record_snapshot, upsert_by_key, RunwayHistoryEntry};
pub use runway::{compute_runway, RunwayResult};
pub use spending::{
    mandatory_subtotal, MandatorySpend, MandatorySpendRow, ManualEstimate, SpendConfig, Transaction,
};
