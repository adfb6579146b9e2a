//! Google Sheets client reading a fixed range through a service account.
//!
//! Every call performs the full exchange: sign an assertion, obtain a token,
//! read the range. Nothing is cached between calls and nothing is retried.
//!
//! # Configuration
//!
//! Supplied once at startup through [`SheetsConfig`]:
//! - spreadsheet id
//! - service account e-mail
//! - service account PEM private key
//! - A1 range (default `DATA!A1:I`)
//!
//! The first three are checked on every read before any network traffic.

use announce_core::AppError;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, instrument};
use url::Url;

mod auth;
mod grid;

pub use grid::{Grid, Row};

/// Values endpoint root. The id and the range are appended as path segments.
const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Range read when none is configured: columns A..I of the `DATA` tab.
pub const DEFAULT_RANGE: &str = "DATA!A1:I";

/// Dataset access errors.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error(
        "ENV belum lengkap. Set GOOGLE_SHEETS_ID, GOOGLE_SERVICE_ACCOUNT_EMAIL, GOOGLE_PRIVATE_KEY_BASE64."
    )]
    MissingConfig,
    #[error("invalid service account key: {0}")]
    InvalidKey(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("values request failed: {0}")]
    Request(String),
}

impl SheetsError {
    /// Whether operators have to fix the deployment before reads can succeed.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingConfig | Self::InvalidKey(_))
    }
}

impl From<SheetsError> for AppError {
    fn from(error: SheetsError) -> Self {
        if error.is_configuration() {
            Self::Configuration(error.to_string())
        } else {
            Self::Upstream(error.to_string())
        }
    }
}

/// Source of the lookup grid.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch the whole configured range.
    async fn fetch_grid(&self) -> Result<Grid, SheetsError>;

    /// Whether the required settings are present. Makes no network call.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Sheets client configuration.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>,
    pub client_email: Option<String>,
    /// PEM encoded RSA private key.
    pub private_key: Option<SecretString>,
    pub range: String,
}

/// Settings after the completeness check.
struct Credentials<'a> {
    spreadsheet_id: &'a str,
    client_email: &'a str,
    private_key: &'a SecretString,
}

impl SheetsConfig {
    fn credentials(&self) -> Result<Credentials<'_>, SheetsError> {
        let spreadsheet_id = present(&self.spreadsheet_id).ok_or(SheetsError::MissingConfig)?;
        let client_email = present(&self.client_email).ok_or(SheetsError::MissingConfig)?;
        let private_key = self
            .private_key
            .as_ref()
            .filter(|k| !k.expose_secret().trim().is_empty())
            .ok_or(SheetsError::MissingConfig)?;

        Ok(Credentials {
            spreadsheet_id,
            client_email,
            private_key,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Sheets service backed by `reqwest`.
#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    config: SheetsConfig,
}

impl std::fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsClient")
            .field("spreadsheet_id", &self.config.spreadsheet_id)
            .field("client_email", &self.config.client_email)
            .field("range", &self.config.range)
            .finish_non_exhaustive()
    }
}

impl SheetsClient {
    /// Create a new client. No request timeout is set; the transport default applies.
    ///
    /// # Errors
    /// Returns `SheetsError::Request` if the HTTP client cannot be built.
    pub fn new(config: SheetsConfig) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .build()
            .map_err(|e| SheetsError::Request(e.to_string()))?;

        info!(
            configured = config.credentials().is_ok(),
            range = %config.range,
            "Sheets client initialized"
        );

        Ok(Self { client, config })
    }

    /// Validate configuration (does not make network calls).
    ///
    /// # Errors
    /// Returns `SheetsError::MissingConfig` if any credential is missing or blank.
    pub fn validate_config(&self) -> Result<(), SheetsError> {
        self.config.credentials().map(|_| ())
    }

    #[instrument(skip(self), fields(range = %self.config.range))]
    async fn read_range(&self) -> Result<Grid, SheetsError> {
        let credentials = self.config.credentials()?;

        let assertion =
            auth::sign_assertion(credentials.client_email, credentials.private_key, Utc::now())?;
        let token = auth::fetch_access_token(&self.client, &assertion).await?;

        let url = values_url(credentials.spreadsheet_id, &self.config.range)?;
        debug!(%url, "Reading spreadsheet values");

        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| SheetsError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "Sheets API error");
            return Err(SheetsError::Request(format!("{status}: {body}")));
        }

        let range: grid::ValueRange = response
            .json()
            .await
            .map_err(|e| SheetsError::Request(e.to_string()))?;
        let grid = range.into_grid();

        debug!(rows = grid.len(), "Spreadsheet values read");
        Ok(grid)
    }
}

#[async_trait]
impl DatasetSource for SheetsClient {
    async fn fetch_grid(&self) -> Result<Grid, SheetsError> {
        self.read_range().await
    }

    fn is_configured(&self) -> bool {
        self.validate_config().is_ok()
    }
}

/// Build `.../spreadsheets/{id}/values/{range}` with both parts percent-encoded.
fn values_url(spreadsheet_id: &str, range: &str) -> Result<Url, SheetsError> {
    let mut url = Url::parse(SHEETS_API_URL).map_err(|e| SheetsError::Request(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| SheetsError::Request("values URL cannot be a base".to_string()))?
        .extend([spreadsheet_id, "values", range]);
    Ok(url)
}
