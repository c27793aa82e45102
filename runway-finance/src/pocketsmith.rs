//! PocketSmith API access: the `FinanceApi` seam and its reqwest client.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use runway_core::time::format_iso;
use runway_core::{RawAccount, RunwayError, Transaction};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.pocketsmith.com/v2";
const DEVELOPER_KEY_HEADER: &str = "x-developer-key";

/// Validated API credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    user_id: String,
}

impl Credentials {
    pub fn new(api_key: Option<&str>, user_id: Option<&str>) -> Result<Self, RunwayError> {
        let api_key = api_key.map(str::trim).filter(|s| !s.is_empty());
        let user_id = user_id.map(str::trim).filter(|s| !s.is_empty());
        match (api_key, user_id) {
            (Some(k), Some(u)) => Ok(Self {
                api_key: k.to_string(),
                user_id: u.to_string(),
            }),
            _ => Err(RunwayError::ConfigurationMissing(
                "POCKETSMITH_API_KEY or POCKETSMITH_USER_ID not set".to_string(),
            )),
        }
    }
}

/// Filters for the debit-transaction listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TransactionQuery {
    /// Trailing year ending yesterday, relative to `today`.
    pub fn trailing_year(today: NaiveDate) -> Self {
        let (start_date, end_date) = runway_core::time::trailing_year_window(today);
        Self { start_date, end_date }
    }

    /// Query string without the page parameter.
    pub fn to_query_string(&self) -> String {
        format!(
            "start_date={}&end_date={}&uncategorised=0&type=debit",
            format_iso(self.start_date),
            format_iso(self.end_date)
        )
    }
}

/// Source of accounts and transactions. Any non-200 answer is an error.
#[allow(async_fn_in_trait)]
pub trait FinanceApi {
    async fn accounts(&self) -> Result<Vec<RawAccount>>;

    /// One page of debit transactions; pages start at 1. An empty page means
    /// there is nothing further.
    async fn transactions_page(
        &self,
        query: &TransactionQuery,
        page: u32,
    ) -> Result<Vec<Transaction>>;
}

#[derive(Debug, Clone)]
pub struct PocketsmithClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl PocketsmithClient {
    pub fn new(credentials: Credentials, base_url: Option<&str>) -> Self {
        let base_url = base_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            credentials,
        }
    }

    pub fn accounts_url(&self) -> String {
        format!("{}/users/{}/accounts", self.base_url, self.credentials.user_id)
    }

    pub fn transactions_url(&self, query: &TransactionQuery, page: u32) -> String {
        format!(
            "{}/users/{}/transactions?{}&page={}",
            self.base_url,
            self.credentials.user_id,
            query.to_query_string(),
            page
        )
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            DEVELOPER_KEY_HEADER,
            HeaderValue::from_str(&self.credentials.api_key)
                .context("API key is not a valid header value")?,
        );
        Ok(headers)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "GET");
        let resp = self
            .http
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .with_context(|| format!("request {url}"))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(RunwayError::ApiRequestFailed {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        resp.json::<T>()
            .await
            .with_context(|| format!("parse response from {url}"))
    }
}

impl FinanceApi for PocketsmithClient {
    async fn accounts(&self) -> Result<Vec<RawAccount>> {
        self.get_json(&self.accounts_url()).await
    }

    async fn transactions_page(
        &self,
        query: &TransactionQuery,
        page: u32,
    ) -> Result<Vec<Transaction>> {
        self.get_json(&self.transactions_url(query, page)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new(Some("key-123"), Some("42")).unwrap()
    }

    #[test]
    fn test_missing_credentials() {
        let cases = [
            (None, Some("42")),
            (Some("key"), None),
            (Some("  "), Some("42")),
            (None, None),
        ];
        for (k, u) in cases {
            let err = Credentials::new(k, u).unwrap_err();
            assert!(matches!(err, RunwayError::ConfigurationMissing(_)));
        }
    }

    #[test]
    fn test_urls() {
        let client = PocketsmithClient::new(creds(), None);
        assert_eq!(client.accounts_url(), "https://api.pocketsmith.com/v2/users/42/accounts");

        let query = TransactionQuery::trailing_year(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        assert_eq!(
            client.transactions_url(&query, 3),
            "https://api.pocketsmith.com/v2/users/42/transactions?\
             start_date=2025-10-14&end_date=2026-10-14&uncategorised=0&type=debit&page=3"
        );
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let client = PocketsmithClient::new(creds(), Some("http://localhost:8080/v2/"));
        assert_eq!(client.accounts_url(), "http://localhost:8080/v2/users/42/accounts");
    }

    #[test]
    fn test_headers_carry_developer_key() {
        let client = PocketsmithClient::new(creds(), None);
        let headers = client.headers().unwrap();
        assert_eq!(headers.get(DEVELOPER_KEY_HEADER).unwrap(), "key-123");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }
}
