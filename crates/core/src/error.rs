//! Structured error handling for the lookup endpoints.
//!
//! Every failure is converted at the request boundary into the uniform
//! `{ "ok": false, "message": ... }` reply. Server-side failures are logged
//! with their full detail; a lookup that simply finds nothing is not an error
//! and never passes through this type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::ApiReply;

/// Prefix prepended to messages of failures the client cannot act upon.
const SERVER_ERROR_PREFIX: &str = "Error server:";

/// Application error type with automatic response conversion.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing client input.
    #[error("{0}")]
    Validation(String),

    /// Deployment secrets are missing or unusable.
    #[error("{0}")]
    Configuration(String),

    /// A required column is absent from the dataset header.
    #[error("{0}")]
    Schema(String),

    /// Transport, auth or quota failure talking to the data provider.
    #[error("{0}")]
    Upstream(String),

    /// The dataset exists but holds no data rows.
    #[error("{0}")]
    DataUnavailable(String),
}

/// Result type alias for the application.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Identifier missing from the request.
    #[must_use]
    pub fn identifier_required() -> Self {
        Self::Validation("NIM wajib diisi.".to_string())
    }

    /// Required column absent from the header row.
    #[must_use]
    pub fn column_missing(column: &str) -> Self {
        Self::Schema(format!("Kolom {column} tidak ditemukan di header."))
    }

    /// Dataset has a header but no data rows.
    #[must_use]
    pub fn data_unavailable() -> Self {
        Self::DataUnavailable("Data belum tersedia.".to_string())
    }

    /// Short machine-readable name, used for logs and metric labels.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Configuration(_) => "configuration",
            Self::Schema(_) => "schema",
            Self::Upstream(_) => "upstream",
            Self::DataUnavailable(_) => "data_unavailable",
        }
    }

    /// HTTP status for this failure.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_)
            | Self::Schema(_)
            | Self::Upstream(_)
            | Self::DataUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the visitor.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Schema(msg) | Self::DataUnavailable(msg) => msg.clone(),
            Self::Configuration(msg) | Self::Upstream(msg) => {
                format!("{SERVER_ERROR_PREFIX} {msg}")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "Lookup failed");
        } else {
            warn!(kind = self.kind(), error = %self, "Lookup rejected");
        }

        (status, Json(ApiReply::<()>::failure(self.client_message()))).into_response()
    }
}
