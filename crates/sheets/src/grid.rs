//! Raw string grid returned by a values read.

use serde::Deserialize;
use serde_json::Value;

/// One spreadsheet row. May be shorter than the header when trailing cells are blank.
pub type Row = Vec<String>;

/// Two-dimensional table of cell strings. Row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    #[must_use]
    pub const fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a grid from string slices, mostly useful for fixtures.
    #[must_use]
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Number of rows including the header.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows after the header.
    #[must_use]
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or_default()
    }
}

/// Body of `spreadsheets.values.get`. `values` is omitted by the API for empty ranges.
#[derive(Debug, Deserialize)]
pub(crate) struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl ValueRange {
    pub(crate) fn into_grid(self) -> Grid {
        Grid::new(
            self.values
                .iter()
                .map(|row| row.iter().map(cell_text).collect())
                .collect(),
        )
    }
}

/// Render a JSON cell as text. `null` is the empty string.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
