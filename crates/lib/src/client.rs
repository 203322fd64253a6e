//! # SheetDB Client
//!
//! A preconfigured HTTP client bound to one SheetDB endpoint. Reads are
//! single-attempt: any failure is returned to the caller, and unless a
//! timeout is set a read waits as long as the server takes. See
//! [`crate::fetcher`] for the retrying variant, which bounds every attempt.

use crate::config::SheetDbConfig;
use crate::constants::{DEFAULT_BASE_URL, SHEET_PARAM, TIMESTAMP_PARAM};
use crate::errors::SheetError;
use crate::response::normalize;
use crate::source::RowSource;
use crate::types::{Row, SheetId};
use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::info;

/// A client for reading sheets from a SheetDB endpoint.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct SheetDbClient {
    http: ReqwestClient,
    endpoint: Url,
    timeout: Option<Duration>,
    cache_bust: bool,
}

/// A builder for [`SheetDbClient`].
#[derive(Debug)]
pub struct SheetDbClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    cache_bust: bool,
}

impl Default for SheetDbClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            cache_bust: true,
        }
    }
}

impl SheetDbClientBuilder {
    /// Creates a builder targeting the default endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetdb::SheetDbClientBuilder;
    ///
    /// let client = SheetDbClientBuilder::new()
    ///     .base_url("https://sheetdb.io/api/v1/example".to_string())
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the SheetDB endpoint. Requests go to `{base_url}/`.
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Starts from loaded configuration: endpoint and cache busting.
    ///
    /// The configured timeout is left out; see [`Self::timeout`].
    pub fn from_config(config: &SheetDbConfig) -> Self {
        Self::new()
            .base_url(config.base_url.clone())
            .cache_bust(config.cache_bust)
    }

    /// Bounds every request. Without this, requests never time out.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables the `_ts` cache-busting parameter.
    pub fn cache_bust(mut self, cache_bust: bool) -> Self {
        self.cache_bust = cache_bust;
        self
    }

    /// Builds the client, validating the endpoint URL.
    pub fn build(self) -> Result<SheetDbClient, SheetError> {
        let endpoint = format!("{}/", self.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| SheetError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut http = ReqwestClient::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(SheetError::ClientBuild)?;

        Ok(SheetDbClient {
            http,
            endpoint,
            timeout: self.timeout,
            cache_bust: self.cache_bust,
        })
    }
}

impl SheetDbClient {
    pub fn builder() -> SheetDbClientBuilder {
        SheetDbClientBuilder::new()
    }

    /// Builds a single-attempt client from loaded configuration.
    ///
    /// `timeout_ms` only bounds the attempts of [`crate::ResilientFetcher`];
    /// the client built here has no timeout.
    pub fn from_config(config: &SheetDbConfig) -> Result<Self, SheetError> {
        SheetDbClientBuilder::from_config(config).build()
    }

    /// The URL every sheet read is sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The per-request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Reads one sheet and returns its normalized rows.
    ///
    /// Transport errors, timeouts and non-2xx statuses are returned as-is.
    pub async fn fetch_sheet(&self, sheet: &SheetId) -> Result<Vec<Row>, SheetError> {
        let sheet_value = sheet.query_value();
        let mut request = self
            .http
            .get(self.endpoint.clone())
            .query(&[(SHEET_PARAM, sheet_value.as_str())]);
        if self.cache_bust {
            request = request.query(&[(TIMESTAMP_PARAM, Utc::now().timestamp_millis())]);
        }

        info!("Fetching sheet '{}' from {}", sheet_value, self.endpoint);
        let response = request.send().await.map_err(SheetError::from_transport)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::Status { status, body });
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                SheetError::Timeout(e.to_string())
            } else {
                SheetError::Deserialization(e)
            }
        })?;
        Ok(normalize(body))
    }

    /// Reads several sheets concurrently, all or nothing.
    ///
    /// Every request is started before any result is awaited. The returned
    /// lists line up with `sheets`. The first request to fail fails the whole
    /// call; requests still in flight keep running and their results are
    /// dropped.
    pub async fn fetch_sheets(&self, sheets: &[SheetId]) -> Result<Vec<Vec<Row>>, SheetError> {
        let handles: Vec<_> = sheets
            .iter()
            .cloned()
            .map(|sheet| {
                let client = self.clone();
                tokio::spawn(async move { client.fetch_sheet(&sheet).await })
            })
            .collect();

        try_join_all(
            handles
                .into_iter()
                .map(|handle| async move { handle.await? }),
        )
        .await
    }
}

#[async_trait]
impl RowSource for SheetDbClient {
    async fn fetch_rows(&self, sheet: &SheetId) -> Result<Vec<Row>, SheetError> {
        self.fetch_sheet(sheet).await
    }
}
