//! # SheetDB Client
//!
//! This crate reads rows from a SheetDB endpoint, the JSON API in front of a
//! spreadsheet. It offers a single-attempt [`SheetDbClient`] whose failures
//! reach the caller, and a [`ResilientFetcher`] that retries with backoff and
//! falls back to an empty row list. Both can read several sheets concurrently
//! while keeping results in request order.

pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod fetcher;
pub mod response;
pub mod retry;
pub mod source;
pub mod types;

pub use client::{SheetDbClient, SheetDbClientBuilder};
pub use config::{load_config, SheetDbConfig};
pub use errors::{ConfigError, SheetError};
pub use fetcher::{FetchReport, ResilientFetcher};
pub use response::{normalize, ResponseBody};
pub use retry::{retry, RetryOutcome, RetryPolicy};
pub use source::RowSource;
pub use types::{CellValue, Row, SheetId};
