use crate::constants::TICKER_MARKER;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single spreadsheet cell as returned by SheetDB.
///
/// The backing sheet's header row defines the columns, so cells are kept as a
/// small union of JSON scalars rather than a fixed record. Anything that is
/// not a scalar (a nested object or array) is kept verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Other(serde_json::Value),
}

impl CellValue {
    /// Returns the cell as a string slice, if it holds text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value.into())
    }
}

/// One record of a sheet: column name to cell value, in no particular order.
pub type Row = HashMap<String, CellValue>;

/// Identifies a tab of the backing spreadsheet.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SheetId {
    /// A ticker symbol, queried as `$SYMBOL`.
    Ticker(String),
    /// A plain tab name, queried verbatim.
    Name(String),
}

impl SheetId {
    pub fn ticker(symbol: impl Into<String>) -> Self {
        SheetId::Ticker(symbol.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        SheetId::Name(name.into())
    }

    /// The value sent in the `sheet` query parameter.
    pub fn query_value(&self) -> String {
        match self {
            SheetId::Ticker(symbol) => format!("{TICKER_MARKER}{symbol}"),
            SheetId::Name(name) => name.clone(),
        }
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query_value())
    }
}

impl From<&str> for SheetId {
    fn from(value: &str) -> Self {
        SheetId::Name(value.to_string())
    }
}

impl From<String> for SheetId {
    fn from(value: String) -> Self {
        SheetId::Name(value)
    }
}
