//! Group classified accounts by type and total their balances.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::account::Account;

/// One row of the "Accounts By Type" tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountTypeSummary {
    pub account_type: String,
    pub total_balance: f64,
}

/// Sum balances per type label.
///
/// Only labels present in the input appear. Rows are sorted ascending by
/// uppercased label; equal labels keep first-seen order.
pub fn summarize_by_type(accounts: &[Account]) -> Vec<AccountTypeSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<AccountTypeSummary> = Vec::new();

    for account in accounts {
        let label = account.type_label();
        match index.get(label) {
            Some(&i) => rows[i].total_balance += account.balance,
            None => {
                index.insert(label, rows.len());
                rows.push(AccountTypeSummary {
                    account_type: label.to_string(),
                    total_balance: account.balance,
                });
            }
        }
    }

    rows.sort_by_cached_key(|r| r.account_type.to_uppercase());
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountType, UNCATEGORIZED};

    fn acct(title: &str, balance: f64, account_type: Option<AccountType>) -> Account {
        Account {
            title: title.to_string(),
            balance,
            account_type,
        }
    }

    #[test]
    fn test_group_sum_and_sort() {
        let accounts = vec![
            acct("Vanguard", 80000.0, Some(AccountType::Investment)),
            acct("Chase Checking", 5000.0, Some(AccountType::Cash)),
            acct("Mystery", 12.5, None),
            acct("Ally Savings", 2500.0, Some(AccountType::Cash)),
            acct("Honda Loan", -12000.0, Some(AccountType::Car)),
        ];

        let rows = summarize_by_type(&accounts);
        let labels: Vec<_> = rows.iter().map(|r| r.account_type.as_str()).collect();
        assert_eq!(labels, vec!["Car", "Cash", "Investment", UNCATEGORIZED]);
        let total = |label: &str| {
            rows.iter().find(|r| r.account_type == label).map(|r| r.total_balance)
        };
        assert_eq!(total("Cash"), Some(7500.0));
        assert_eq!(total("Car"), Some(-12000.0));
        assert_eq!(total("Condo"), None);
    }

    #[test]
    fn test_totals_are_conserved() {
        let accounts = vec![
            acct("a", 10.25, Some(AccountType::Cash)),
            acct("b", 99.75, Some(AccountType::Condo)),
            acct("c", -40.0, None),
            acct("d", 0.0, Some(AccountType::Cash)),
        ];
        let input: f64 = accounts.iter().map(|a| a.balance).sum();
        let grouped: f64 = summarize_by_type(&accounts).iter().map(|r| r.total_balance).sum();
        assert!((input - grouped).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(summarize_by_type(&[]).is_empty());
    }

    #[test]
    fn test_cash_and_blank_example() {
        let accounts = vec![
            acct("Chase Checking", 5000.0, Some(AccountType::Cash)),
            acct("Chase Checking 2", 0.0, None),
        ];
        let rows = summarize_by_type(&accounts);
        assert_eq!(
            rows,
            vec![
                AccountTypeSummary { account_type: "Cash".into(), total_balance: 5000.0 },
                AccountTypeSummary { account_type: UNCATEGORIZED.into(), total_balance: 0.0 },
            ]
        );
    }
}
