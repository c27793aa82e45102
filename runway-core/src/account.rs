//! Account records and the deterministic type classifier.
//!
//! Classification is a pure function of the title and the configured rules:
//! exact cash titles, then exact investment titles, then the car substring,
//! then the exact condo title. No match leaves the type blank.

use serde::{Deserialize, Serialize};

use crate::amount::loose_amount;

/// Label used for accounts whose type is blank.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Account buckets assigned by the classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountType {
    Cash,
    Investment,
    Car,
    Condo,
}

impl AccountType {
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Cash => "Cash",
            AccountType::Investment => "Investment",
            AccountType::Car => "Car",
            AccountType::Condo => "Condo",
        }
    }
}

/// Account as returned by `GET /users/{id}/accounts`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawAccount {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_amount")]
    pub current_balance: Option<f64>,
}

impl RawAccount {
    pub fn new(title: impl Into<String>, current_balance: f64) -> Self {
        Self {
            title: Some(title.into()),
            current_balance: Some(current_balance),
        }
    }
}

/// A classified account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub title: String,
    pub balance: f64,
    /// `None` is written as a blank type and grouped as "Uncategorized"
    pub account_type: Option<AccountType>,
}

impl Account {
    /// Label used for grouping.
    pub fn type_label(&self) -> &'static str {
        self.account_type
            .map(|t| t.label())
            .unwrap_or(UNCATEGORIZED)
    }
}

/// Name lists and identifiers driving classification, already uppercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationRules {
    cash_titles: Vec<String>,
    investment_titles: Vec<String>,
    car_identifier: String,
    condo_identifier: String,
}

impl ClassificationRules {
    pub fn new<S: AsRef<str>>(
        cash_titles: &[S],
        investment_titles: &[S],
        car_identifier: &str,
        condo_identifier: &str,
    ) -> Self {
        Self {
            cash_titles: normalize_list(cash_titles),
            investment_titles: normalize_list(investment_titles),
            car_identifier: car_identifier.trim().to_uppercase(),
            condo_identifier: condo_identifier.trim().to_uppercase(),
        }
    }

    /// Build rules from comma-separated lists, e.g. `"Chase Checking, Ally Savings"`.
    pub fn from_csv_lists(
        cash_titles: &str,
        investment_titles: &str,
        car_identifier: &str,
        condo_identifier: &str,
    ) -> Self {
        Self::new(
            &split_list(cash_titles),
            &split_list(investment_titles),
            car_identifier,
            condo_identifier,
        )
    }

    /// Classify a single title. First match wins.
    pub fn classify(&self, title: &str) -> Option<AccountType> {
        let upper = title.to_uppercase();

        if self.cash_titles.iter().any(|t| *t == upper) {
            return Some(AccountType::Cash);
        }
        if self.investment_titles.iter().any(|t| *t == upper) {
            return Some(AccountType::Investment);
        }
        if !self.car_identifier.is_empty() && upper.contains(&self.car_identifier) {
            return Some(AccountType::Car);
        }
        if !self.condo_identifier.is_empty() && upper == self.condo_identifier {
            return Some(AccountType::Condo);
        }
        None
    }
}

/// Split a comma-separated setting into trimmed, non-empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.as_ref().trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Classify raw accounts, preserving input order.
pub fn classify_accounts(raw: &[RawAccount], rules: &ClassificationRules) -> Vec<Account> {
    raw.iter()
        .map(|r| {
            let title = r.title.clone().unwrap_or_default();
            let account_type = rules.classify(&title);
            Account {
                title,
                balance: r.current_balance.unwrap_or(0.0),
                account_type,
            }
        })
        .collect()
}
