//! # Resilient Fetcher
//!
//! Wraps a [`RowSource`] with the retry policy. Failed reads are retried with
//! quadratic backoff; once the attempts run out the failure is logged and an
//! empty row list is returned in its place. Callers of [`ResilientFetcher::fetch`]
//! therefore never see an error, and cannot tell an empty sheet from a failed
//! one. [`ResilientFetcher::fetch_detailed`] keeps that distinction.

use crate::client::SheetDbClientBuilder;
use crate::config::SheetDbConfig;
use crate::errors::SheetError;
use crate::retry::{retry, RetryPolicy};
use crate::source::RowSource;
use crate::types::{Row, SheetId};
use futures::future::join_all;
use tracing::{debug, error, warn};

/// What a retried read produced and how it got there.
#[derive(Debug)]
pub struct FetchReport {
    /// The rows read, or an empty list when every attempt failed.
    pub rows: Vec<Row>,
    pub attempts: u32,
    /// The error of the final attempt, if it failed.
    pub last_error: Option<SheetError>,
}

impl FetchReport {
    pub fn is_success(&self) -> bool {
        self.last_error.is_none()
    }
}

/// A sheet reader that retries and never fails.
#[derive(Clone, Debug)]
pub struct ResilientFetcher {
    source: Box<dyn RowSource>,
    policy: RetryPolicy,
}

impl ResilientFetcher {
    pub fn new(source: Box<dyn RowSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Builds a fetcher over a [`crate::SheetDbClient`] using the configured policy.
    ///
    /// Each attempt is bounded by `timeout_ms`; an attempt that runs out of
    /// time fails and is retried like any other.
    pub fn from_config(config: &SheetDbConfig) -> Result<Self, SheetError> {
        let client = SheetDbClientBuilder::from_config(config)
            .timeout(config.timeout())
            .build()?;
        Ok(Self::new(Box::new(client), config.retry_policy()))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Reads `sheet` under the retry policy and reports every detail.
    pub async fn fetch_detailed(&self, sheet: &SheetId) -> FetchReport {
        let source = &self.source;
        let outcome = retry(&self.policy, move |attempt| async move {
            debug!("Reading sheet '{sheet}', attempt {attempt}");
            source.fetch_rows(sheet).await
        })
        .await;

        match outcome.result {
            Ok(rows) => FetchReport {
                rows,
                attempts: outcome.attempts,
                last_error: None,
            },
            Err(e) => FetchReport {
                rows: Vec::new(),
                attempts: outcome.attempts,
                last_error: Some(e),
            },
        }
    }

    /// Reads `sheet`, substituting an empty list once every attempt has failed.
    pub async fn fetch(&self, sheet: &SheetId) -> Vec<Row> {
        let report = self.fetch_detailed(sheet).await;
        if let Some(e) = &report.last_error {
            warn!(
                "Fetching sheet '{}' failed after {} attempts: {}",
                sheet, report.attempts, e
            );
        }
        report.rows
    }

    /// Reads the `$TICKER` tab for a ticker symbol.
    pub async fn get_sheet_by_ticker(&self, ticker: &str) -> Vec<Row> {
        self.fetch(&SheetId::ticker(ticker)).await
    }

    /// Reads a tab by its plain name.
    pub async fn get_sheet_by_name(&self, name: &str) -> Vec<Row> {
        self.fetch(&SheetId::name(name)).await
    }

    /// Reads several sheets concurrently; results line up with `sheets`.
    ///
    /// Each sheet absorbs its own failure, so one bad tab only empties its
    /// own slot.
    pub async fn fetch_many(&self, sheets: &[SheetId]) -> Vec<Vec<Row>> {
        let handles: Vec<_> = sheets
            .iter()
            .cloned()
            .map(|sheet| {
                let fetcher = self.clone();
                tokio::spawn(async move { fetcher.fetch(&sheet).await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(sheets)
            .map(|(result, sheet)| {
                result.unwrap_or_else(|e| {
                    error!("Fetch task for sheet '{sheet}' did not complete: {e}");
                    Vec::new()
                })
            })
            .collect()
    }
}
