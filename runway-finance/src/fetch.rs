//! Page-by-page transaction retrieval.

use runway_core::Transaction;
use tracing::{info, warn};

use crate::pocketsmith::{FinanceApi, TransactionQuery};

/// Everything retrieved for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFetch {
    pub transactions: Vec<Transaction>,
    /// Non-empty pages received
    pub pages: u32,
    /// Set when a failed page cut retrieval short
    pub stopped_early: Option<String>,
}

/// Request pages 1, 2, 3, … until an empty page.
///
/// A failed page ends retrieval without failing the run; whatever was
/// gathered so far is returned. Pages are requested one at a time.
pub async fn fetch_all_transactions(
    api: &impl FinanceApi,
    query: &TransactionQuery,
) -> TransactionFetch {
    let mut out = TransactionFetch::default();
    let mut page = 1u32;

    loop {
        info!(page, "fetching transactions page");
        match api.transactions_page(query, page).await {
            Ok(batch) if batch.is_empty() => break,
            Ok(batch) => {
                out.transactions.extend(batch);
                out.pages += 1;
                page += 1;
            }
            Err(e) => {
                warn!(
                    page,
                    error = %format!("{e:#}"),
                    "transaction fetch stopped early, keeping partial results"
                );
                out.stopped_early = Some(format!("page {page}: {e:#}"));
                break;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use chrono::NaiveDate;
    use runway_core::{RawAccount, RunwayError};
    use std::cell::RefCell;

    /// Serves `pages[n - 1]` for page n; pages past the end are empty.
    struct PagedApi {
        pages: Vec<Result<Vec<Transaction>, u16>>,
        requested: RefCell<Vec<u32>>,
    }

    impl PagedApi {
        fn new(pages: Vec<Result<Vec<Transaction>, u16>>) -> Self {
            Self {
                pages,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl FinanceApi for PagedApi {
        async fn accounts(&self) -> Result<Vec<RawAccount>> {
            Err(anyhow!("not used"))
        }

        async fn transactions_page(
            &self,
            _query: &TransactionQuery,
            page: u32,
        ) -> Result<Vec<Transaction>> {
            self.requested.borrow_mut().push(page);
            match self.pages.get(page as usize - 1) {
                Some(Ok(batch)) => Ok(batch.clone()),
                Some(Err(status)) => Err(RunwayError::ApiRequestFailed {
                    status: *status,
                    body: String::new(),
                }
                .into()),
                None => Ok(Vec::new()),
            }
        }
    }

    fn query() -> TransactionQuery {
        TransactionQuery::trailing_year(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())
    }

    fn txns(titles: &[&str]) -> Vec<Transaction> {
        titles.iter().map(|t| Transaction::new(t, -1.0)).collect()
    }

    #[tokio::test]
    async fn test_collects_until_empty_page_in_order() {
        let api = PagedApi::new(vec![Ok(txns(&["a", "b"])), Ok(txns(&["c"]))]);
        let fetch = fetch_all_transactions(&api, &query()).await;

        let titles: Vec<_> = fetch.transactions.iter().map(|t| t.category_title()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert_eq!(fetch.pages, 2);
        assert_eq!(fetch.stopped_early, None);
        assert_eq!(*api.requested.borrow(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failure_keeps_partial_results() {
        let api = PagedApi::new(vec![Ok(txns(&["a"])), Err(500), Ok(txns(&["never"]))]);
        let fetch = fetch_all_transactions(&api, &query()).await;

        assert_eq!(fetch.transactions.len(), 1);
        assert_eq!(*api.requested.borrow(), vec![1, 2]);
        let reason = fetch.stopped_early.unwrap();
        assert!(reason.contains("page 2") && reason.contains("500"), "{reason}");
    }

    #[tokio::test]
    async fn test_first_page_failure_is_empty_not_error() {
        let api = PagedApi::new(vec![Err(503)]);
        let fetch = fetch_all_transactions(&api, &query()).await;
        assert!(fetch.transactions.is_empty());
        assert!(fetch.stopped_early.is_some());
    }
}
