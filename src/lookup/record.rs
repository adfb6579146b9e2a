//! Resolved result row.

use serde::Serialize;

use super::{ColumnIndexMap, Field};

/// One matched row with every value trimmed. Absent cells are empty strings.
///
/// Serialized with the field names existing clients read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub nim: String,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "fakultas")]
    pub faculty: String,
    #[serde(rename = "biro")]
    pub bureau: String,
    pub status: String,
    #[serde(rename = "narahubungNama")]
    pub contact_name: String,
    #[serde(rename = "narahubungWA")]
    pub contact_whatsapp: String,
    #[serde(rename = "narahubungLine")]
    pub contact_line: String,
    #[serde(rename = "catatan")]
    pub note: String,
}

impl Record {
    pub(crate) fn from_row(columns: &ColumnIndexMap, row: &[String]) -> Self {
        let cell = |field| columns.cell(row, field).to_string();

        Self {
            nim: cell(Field::Nim),
            name: cell(Field::Name),
            faculty: cell(Field::Faculty),
            bureau: cell(Field::Bureau),
            status: cell(Field::Status),
            contact_name: cell(Field::ContactName),
            contact_whatsapp: cell(Field::ContactWhatsapp),
            contact_line: cell(Field::ContactLine),
            note: cell(Field::Note),
        }
    }
}
