//! Fixed values of the SheetDB endpoint and the client defaults.

/// The SheetDB endpoint queried when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://sheetdb.io/api/v1/pzq4zwvekqhqp";

/// Prefix prepended to ticker symbols to form their tab name (e.g. `$AAPL`).
pub const TICKER_MARKER: char = '$';

/// Query parameter naming the tab to read.
pub const SHEET_PARAM: &str = "sheet";

/// Query parameter carrying the cache-busting timestamp.
pub const TIMESTAMP_PARAM: &str = "_ts";

/// Field under which some responses wrap their row list.
pub const DATA_FIELD: &str = "data";

pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 250;

/// Prefix of the environment variables read by `load_config`.
pub const ENV_PREFIX: &str = "SHEETDB";
