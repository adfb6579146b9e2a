//! Identifier lookup over a fetched grid.
//!
//! Columns are resolved by header name on every call, so the sheet owners
//! may reorder or insert columns freely. Only the `NIM` column is mandatory.

mod columns;
mod record;

use announce_core::AppError;
use announce_sheets::Grid;
use tracing::debug;

pub use columns::{ColumnIndexMap, Field};
pub use record::Record;

/// Result of a lookup that reached the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(Record),
    NotFound,
}

/// Find the first data row whose `NIM` cell, trimmed, equals `key` exactly.
///
/// `key` must already be trimmed and non-empty.
///
/// # Errors
/// - `AppError::DataUnavailable` when the grid has no data rows
/// - `AppError::Schema` when the header lacks a `NIM` column
pub fn resolve(grid: &Grid, key: &str) -> Result<LookupOutcome, AppError> {
    let Some(header) = grid.header().filter(|_| grid.len() >= 2) else {
        return Err(AppError::data_unavailable());
    };

    let columns = ColumnIndexMap::from_header(header);
    let nim_column = columns.require(Field::Nim)?;

    let matched = grid.data_rows().iter().find(|row| {
        row.get(nim_column)
            .is_some_and(|cell| cell.trim() == key)
    });

    debug!(rows = grid.data_rows().len(), found = matched.is_some(), "Grid scanned");

    Ok(matched.map_or(LookupOutcome::NotFound, |row| {
        LookupOutcome::Found(Record::from_row(&columns, row))
    }))
}
