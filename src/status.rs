//! Status classification.

use announce_core::StrExt;
use serde::Serialize;

const PASSED: &str = "lulus";
const FAILED: &str = "tidak lulus";

/// Outcome shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Passed,
    Failed,
    /// Anything that is not exactly passed or failed, including blanks.
    Pending,
}

impl Verdict {
    /// Whether the confetti effect plays. Only an exact pass qualifies.
    #[inline]
    #[must_use]
    pub const fn celebrates(self) -> bool {
        matches!(self, Self::Passed)
    }

    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Passed => "✅ LULUS",
            Self::Failed => "❌ TIDAK LULUS",
            Self::Pending => "⏳ MENUNGGU",
        }
    }

    /// Style tone of the badge.
    #[must_use]
    pub const fn tone(self) -> &'static str {
        match self {
            Self::Passed => "ok",
            Self::Failed => "no",
            Self::Pending => "maybe",
        }
    }
}

/// Trim, lowercase and collapse whitespace runs.
#[must_use]
pub fn normalize_status(raw: &str) -> String {
    raw.to_lowercase().squish()
}

#[must_use]
pub fn classify(raw: &str) -> Verdict {
    match normalize_status(raw).as_str() {
        PASSED => Verdict::Passed,
        FAILED => Verdict::Failed,
        _ => Verdict::Pending,
    }
}
