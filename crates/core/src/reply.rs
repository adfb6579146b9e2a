//! Uniform JSON reply envelope.

use serde::Serialize;

/// Reply body shared by every lookup endpoint.
///
/// Successful replies carry `data`, failed ones carry `message`. Both are
/// never present at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiReply<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiReply<T> {
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            message: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            message: Some(message.into()),
        }
    }
}
