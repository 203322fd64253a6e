use crate::errors::SheetError;
use crate::types::{Row, SheetId};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// Anything that can read the rows of a sheet in a single attempt.
///
/// [`crate::SheetDbClient`] is the production implementation. The retrying
/// [`crate::ResilientFetcher`] is written against this trait so it can be
/// driven by an in-memory source in tests.
#[async_trait]
pub trait RowSource: Send + Sync + Debug + DynClone {
    /// Reads the normalized rows of `sheet`, failing on any transport or status error.
    async fn fetch_rows(&self, sheet: &SheetId) -> Result<Vec<Row>, SheetError>;
}

dyn_clone::clone_trait_object!(RowSource);
