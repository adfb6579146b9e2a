//! Extension traits for `str` type conversions.
//!
//! Spreadsheet cells have no null state: a blank cell is an empty string.
//! These helpers turn that convention into `Option` and defaults.

/// Extension trait for `str` to handle empty-as-none semantics.
pub trait StrExt {
    /// Returns `Some(String)` if non-empty, `None` if empty.
    #[must_use]
    fn to_opt(&self) -> Option<String>;

    /// Returns self if non-empty, otherwise returns `default`.
    #[must_use]
    fn or_str<'a>(&'a self, default: &'a str) -> &'a str;

    /// Trims and collapses every run of whitespace into a single space.
    #[must_use]
    fn squish(&self) -> String;
}

impl StrExt for str {
    #[inline]
    fn to_opt(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_string())
    }

    #[inline]
    fn or_str<'a>(&'a self, default: &'a str) -> &'a str {
        if self.is_empty() { default } else { self }
    }

    fn squish(&self) -> String {
        self.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
