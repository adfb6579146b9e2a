//! Header-driven column resolution.

use announce_core::AppError;

/// Logical fields of a result row, in header order of the reference sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Nim,
    Name,
    Faculty,
    Bureau,
    Status,
    ContactName,
    ContactWhatsapp,
    ContactLine,
    Note,
}

impl Field {
    pub const COUNT: usize = 9;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Nim,
        Self::Name,
        Self::Faculty,
        Self::Bureau,
        Self::Status,
        Self::ContactName,
        Self::ContactWhatsapp,
        Self::ContactLine,
        Self::Note,
    ];

    /// Header text identifying the column, matched case-insensitively.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Nim => "NIM",
            Self::Name => "Nama",
            Self::Faculty => "Fakultas",
            Self::Bureau => "Biro/Departemen",
            Self::Status => "Status",
            Self::ContactName => "Narahubung_Nama",
            Self::ContactWhatsapp => "Narahubung_WA",
            Self::ContactLine => "Narahubung_Line",
            Self::Note => "Catatan",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Zero-based column position of every field, derived from one header row.
///
/// `None` marks a field whose header is absent. That is only an error for
/// fields the caller [`require`](Self::require)s; other absent fields read
/// as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndexMap {
    positions: [Option<usize>; Field::COUNT],
}

impl ColumnIndexMap {
    /// Map each field to the first header cell equal to its name after
    /// trimming, ignoring case.
    #[must_use]
    pub fn from_header(header: &[String]) -> Self {
        let normalized: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();

        let mut positions = [None; Field::COUNT];
        for field in Field::ALL {
            let wanted = field.header().to_lowercase();
            positions[field.slot()] = normalized.iter().position(|h| *h == wanted);
        }

        Self { positions }
    }

    #[inline]
    #[must_use]
    pub const fn position(&self, field: Field) -> Option<usize> {
        self.positions[field.slot()]
    }

    /// Position of a field the dataset cannot do without.
    ///
    /// # Errors
    /// Returns `AppError::Schema` naming the missing column.
    pub fn require(&self, field: Field) -> Result<usize, AppError> {
        self.position(field)
            .ok_or_else(|| AppError::column_missing(field.header()))
    }

    /// Trimmed cell of `field` in `row`; empty when the column or the cell is absent.
    #[must_use]
    pub fn cell<'a>(&self, row: &'a [String], field: Field) -> &'a str {
        self.position(field)
            .and_then(|i| row.get(i))
            .map_or("", |cell| cell.trim())
    }
}
