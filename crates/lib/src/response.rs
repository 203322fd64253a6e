//! # Response Normalization
//!
//! SheetDB answers a sheet read with either a bare list of rows or an object
//! wrapping that list under `data`. Every other shape is treated as an empty
//! sheet. The shapes are classified once into [`ResponseBody`] so that the
//! fallback stays in one place. List items that are not objects cannot be
//! rows and are dropped one by one; the rest of the list is kept.

use crate::constants::DATA_FIELD;
use crate::types::{CellValue, Row};
use serde_json::Value;
use tracing::debug;

/// The decoded body of a sheet read, classified by shape.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    /// The body is itself a list of rows.
    Rows(Vec<Row>),
    /// The body is an object holding the rows under `data`.
    Wrapped(Vec<Row>),
    /// Any other shape.
    Unrecognized,
}

impl ResponseBody {
    /// Classifies a decoded JSON body.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => ResponseBody::Rows(rows_from_items(items)),
            Value::Object(mut map) => match map.remove(DATA_FIELD) {
                Some(Value::Array(items)) => ResponseBody::Wrapped(rows_from_items(items)),
                _ => ResponseBody::Unrecognized,
            },
            _ => ResponseBody::Unrecognized,
        }
    }

    /// Maps the body onto the canonical row list.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            ResponseBody::Rows(rows) | ResponseBody::Wrapped(rows) => rows,
            ResponseBody::Unrecognized => Vec::new(),
        }
    }
}

/// Normalizes any decoded body to a row list, defaulting to empty.
pub fn normalize(value: Value) -> Vec<Row> {
    let body = ResponseBody::from_value(value);
    if body == ResponseBody::Unrecognized {
        debug!("Unrecognized SheetDB response shape, returning no rows.");
    }
    body.into_rows()
}

fn rows_from_items(items: Vec<Value>) -> Vec<Row> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(cells) => Some(
                cells
                    .into_iter()
                    .map(|(column, value)| (column, cell_from_value(value)))
                    .collect(),
            ),
            other => {
                debug!("Skipping list item {index}, not a row: {other}");
                None
            }
        })
        .collect()
}

fn cell_from_value(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(b),
        Value::Number(n) => CellValue::Number(n),
        Value::String(s) => CellValue::String(s),
        other => CellValue::Other(other),
    }
}
