//! Mandatory spend: transaction filtering and the annual spend table.

use serde::{Deserialize, Serialize};

use crate::amount::loose_amount;

pub const API_ROW_LABEL: &str = "Pocketsmith Mandatory Spend (API Calculated)";
pub const GRAND_TOTAL_LABEL: &str = "Grand Total Mandatory Spend";
pub const DAILY_LABEL: &str = "Total Mandatory Spend (Daily)";
pub const TWO_MONTH_LABEL: &str = "Total Mandatory Spend (2 Months)";

/// Categories containing this (uppercased) never count, even when allow-listed.
const EXCLUDED_MARKER: &str = "GROCERIES";

const DEFAULT_CATEGORIES: &[&str] = &[
    "Mortgages",
    "Homeowners Association",
    "Auto Insurance",
    "Healthcare & Medical",
    "Car",
    "Utilities",
    "Dues and Subscriptions",
    "State Tax",
    "Yearly Subscriptions",
    "Fees & Charges",
    "Hair",
    "Gas & Fuel",
    "Education",
    "Tax Preparation",
];

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TransactionCategory {
    #[serde(default)]
    pub title: Option<String>,
}

/// Transaction as returned by the transactions endpoint. Debits are negative.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default)]
    pub category: Option<TransactionCategory>,
    #[serde(default, deserialize_with = "loose_amount")]
    pub amount: Option<f64>,
}

impl Transaction {
    pub fn new(category_title: &str, amount: f64) -> Self {
        Self {
            category: Some(TransactionCategory {
                title: Some(category_title.to_string()),
            }),
            amount: Some(amount),
        }
    }

    pub fn category_title(&self) -> &str {
        self.category
            .as_ref()
            .and_then(|c| c.title.as_deref())
            .unwrap_or("Uncategorized")
    }
}

/// A fixed annual estimate entered by hand, stored pre-signed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualEstimate {
    pub label: String,
    pub amount: f64,
}

impl ManualEstimate {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Allow-list and manual rows for the spend table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpendConfig {
    /// Case-sensitive category titles counted as mandatory
    pub categories: Vec<String>,
    /// Written after the API row, in this order
    pub manual_estimates: Vec<ManualEstimate>,
}

impl Default for SpendConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            manual_estimates: vec![
                ManualEstimate::new("Groceries Estimate", 4364.28),
                ManualEstimate::new("Restaurant Estimate", 8710.92),
                ManualEstimate::new("Health Insurance Estimate", 6500.00),
            ],
        }
    }
}

impl SpendConfig {
    pub fn is_mandatory(&self, category_title: &str) -> bool {
        self.categories.iter().any(|c| c == category_title)
            && !category_title.to_uppercase().contains(EXCLUDED_MARKER)
    }
}

/// Sum of raw (signed) amounts over mandatory transactions.
pub fn mandatory_subtotal(transactions: &[Transaction], config: &SpendConfig) -> f64 {
    transactions
        .iter()
        .filter(|t| config.is_mandatory(t.category_title()))
        .map(|t| t.amount.unwrap_or(0.0))
        .sum()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MandatorySpendRow {
    pub label: String,
    pub annual_amount: f64,
}

impl MandatorySpendRow {
    fn new(label: impl Into<String>, annual_amount: f64) -> Self {
        Self {
            label: label.into(),
            annual_amount,
        }
    }
}

/// The finalized "Mandatory Spending" table. Row order is semantic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MandatorySpend {
    pub api_row: MandatorySpendRow,
    pub manual_rows: Vec<MandatorySpendRow>,
    pub grand_total: f64,
}

impl MandatorySpend {
    /// Combine the API subtotal (negated into a positive cost) with the manual rows.
    pub fn assemble(api_subtotal: f64, config: &SpendConfig) -> Self {
        // keep a zero subtotal from rendering as "-0.00"
        let api_amount = if api_subtotal == 0.0 { 0.0 } else { -api_subtotal };
        let api_row = MandatorySpendRow::new(API_ROW_LABEL, api_amount);
        let manual_rows: Vec<_> = config
            .manual_estimates
            .iter()
            .map(|m| MandatorySpendRow::new(m.label.clone(), m.amount))
            .collect();
        let manual_total: f64 = manual_rows.iter().map(|r| r.annual_amount).sum();
        let grand_total = api_row.annual_amount + manual_total;
        Self {
            api_row,
            manual_rows,
            grand_total,
        }
    }

    pub fn daily(&self) -> f64 {
        self.grand_total / 365.0
    }

    pub fn two_month(&self) -> f64 {
        self.grand_total / 6.0
    }

    /// All rows in table order: API, manual, grand total, daily, 2-month.
    pub fn rows(&self) -> Vec<MandatorySpendRow> {
        let mut rows = Vec::with_capacity(self.manual_rows.len() + 4);
        rows.push(self.api_row.clone());
        rows.extend(self.manual_rows.iter().cloned());
        rows.push(MandatorySpendRow::new(GRAND_TOTAL_LABEL, self.grand_total));
        rows.push(MandatorySpendRow::new(DAILY_LABEL, self.daily()));
        rows.push(MandatorySpendRow::new(TWO_MONTH_LABEL, self.two_month()));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(categories: &[&str]) -> SpendConfig {
        SpendConfig {
            categories: categories.iter().map(|s| s.to_string()).collect(),
            manual_estimates: vec![ManualEstimate::new("Rent Estimate", 1200.0)],
        }
    }

    #[test]
    fn test_mortgage_counts_groceries_does_not() {
        let txns = vec![
            Transaction::new("Mortgages", -1000.0),
            Transaction::new("Groceries", -200.0),
        ];
        let cfg = config(&["Mortgages"]);
        let subtotal = mandatory_subtotal(&txns, &cfg);
        assert_eq!(subtotal, -1000.0);
        assert_eq!(MandatorySpend::assemble(subtotal, &cfg).api_row.annual_amount, 1000.0);
    }

    #[test]
    fn test_groceries_excluded_even_when_allow_listed() {
        let txns = vec![
            Transaction::new("Weekly Groceries", -150.0),
            Transaction::new("Utilities", -90.0),
        ];
        let cfg = config(&["Weekly Groceries", "Utilities"]);
        assert_eq!(mandatory_subtotal(&txns, &cfg), -90.0);
    }

    #[test]
    fn test_allow_list_is_case_sensitive() {
        let txns = vec![Transaction::new("utilities", -90.0)];
        assert_eq!(mandatory_subtotal(&txns, &config(&["Utilities"])), 0.0);
    }

    #[test]
    fn test_missing_category_defaults_to_uncategorized() {
        let txns = vec![
            Transaction {
                category: None,
                amount: Some(-30.0),
            },
            Transaction {
                category: Some(TransactionCategory { title: None }),
                amount: Some(-20.0),
            },
            Transaction {
                category: Some(TransactionCategory {
                    title: Some("Uncategorized".into()),
                }),
                amount: None,
            },
        ];
        assert_eq!(mandatory_subtotal(&txns, &config(&["Uncategorized"])), -50.0);
        assert_eq!(mandatory_subtotal(&txns, &config(&["Mortgages"])), 0.0);
    }

    #[test]
    fn test_assemble_row_order_and_derived_rows() {
        let cfg = SpendConfig {
            categories: vec![],
            manual_estimates: vec![
                ManualEstimate::new("Groceries Estimate", 4000.0),
                ManualEstimate::new("Health Insurance Estimate", 6000.0),
            ],
        };
        let spend = MandatorySpend::assemble(-8600.0, &cfg);
        let rows = spend.rows();
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                API_ROW_LABEL,
                "Groceries Estimate",
                "Health Insurance Estimate",
                GRAND_TOTAL_LABEL,
                DAILY_LABEL,
                TWO_MONTH_LABEL,
            ]
        );
        assert_eq!(rows[0].annual_amount, 8600.0);
        assert_eq!(spend.grand_total, 18600.0);
        assert!((rows[4].annual_amount - 18600.0 / 365.0).abs() < 1e-9);
        assert_eq!(rows[5].annual_amount, 3100.0);
    }

    #[test]
    fn test_zero_transactions_still_assembles() {
        let cfg = SpendConfig::default();
        let subtotal = mandatory_subtotal(&[], &cfg);
        assert_eq!(subtotal, 0.0);
        let spend = MandatorySpend::assemble(subtotal, &cfg);
        assert_eq!(spend.api_row.annual_amount, 0.0);
        assert!((spend.grand_total - (4364.28 + 8710.92 + 6500.0)).abs() < 1e-9);
    }

    #[test]
    fn test_transactions_from_json() {
        let txns: Vec<Transaction> = serde_json::from_str(
            r#"[{"id": 9, "amount": -1000, "category": {"id": 3, "title": "Mortgages"}},
                {"amount": "-12.50", "category": null}]"#,
        )
        .unwrap();
        assert_eq!(txns[0].category_title(), "Mortgages");
        assert_eq!(txns[1].amount, Some(-12.5));
        assert_eq!(txns[1].category_title(), "Uncategorized");
    }
}
