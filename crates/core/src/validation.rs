//! Request validation helpers.

use crate::AppError;

/// Trim the submitted identifier and reject it when nothing is left.
///
/// # Errors
/// Returns `AppError::Validation` when the identifier is missing or blank.
pub fn require_identifier(raw: Option<&str>) -> Result<&str, AppError> {
    let identifier = raw.map(str::trim).unwrap_or_default();
    if identifier.is_empty() {
        return Err(AppError::identifier_required());
    }
    Ok(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_is_trimmed() {
        assert_eq!(require_identifier(Some("  2201 ")).unwrap(), "2201");
    }

    #[test]
    fn missing_or_blank_identifier_is_rejected() {
        assert!(matches!(
            require_identifier(None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            require_identifier(Some("   ")),
            Err(AppError::Validation(_))
        ));
    }
}
