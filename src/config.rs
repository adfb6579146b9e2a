//! Configuration parsed once at startup from CLI arguments and environment.

use std::net::SocketAddr;

use announce_sheets::{DEFAULT_RANGE, SheetsConfig};
use announce_telemetry::TelemetryConfig;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use clap::Parser;
use secrecy::{ExposeSecret, SecretString};

/// Decoder for the base64 key variable. Padding is optional.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Announcement lookup service configuration.
///
/// All values can be set via environment variables or CLI arguments. The
/// dataset credentials are optional here: when they are missing the service
/// still starts and every lookup reports a configuration error.
#[derive(Debug, Clone, Parser)]
#[command(name = "announce-service", about = "Graduation announcement lookup service")]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDRESS", default_value = "0.0.0.0:8080")]
    pub listen_address: String,

    /// CORS allowed origins (comma-separated, or "*" for any)
    #[arg(long, env = "CORS_ALLOW_ORIGINS")]
    pub cors_allow_origins: Option<String>,

    /// Spreadsheet id of the dataset
    #[arg(long, env = "GOOGLE_SHEETS_ID")]
    pub sheets_id: Option<String>,

    /// Service account e-mail
    #[arg(long, env = "GOOGLE_SERVICE_ACCOUNT_EMAIL")]
    pub service_account_email: Option<String>,

    /// Service account PEM private key, base64 encoded (preferred)
    #[arg(long, env = "GOOGLE_PRIVATE_KEY_BASE64")]
    pub private_key_base64: Option<SecretString>,

    /// Service account PEM private key with escaped `\n` line breaks
    #[arg(long, env = "GOOGLE_PRIVATE_KEY")]
    pub private_key: Option<SecretString>,

    /// A1 range holding the header row and data rows
    #[arg(long, env = "SHEETS_RANGE", default_value = DEFAULT_RANGE)]
    pub sheets_range: String,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Use JSON log format
    #[arg(long, env = "JSON_LOGS", default_value = "true")]
    pub json_logs: bool,

    /// OpenTelemetry OTLP endpoint
    #[arg(long, env = "OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Sentry DSN for error tracking
    #[arg(long, env = "SENTRY_DSN")]
    pub sentry_dsn: Option<String>,

    /// Environment name (e.g., "production", "development")
    #[arg(long, env = "ENVIRONMENT")]
    pub environment: Option<String>,
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid listen address: {0}")]
    InvalidListenAddress(String),
    #[error("Sheets range must not be empty")]
    EmptyRange,
    #[error("GOOGLE_PRIVATE_KEY_BASE64 is not valid base64 encoded UTF-8")]
    InvalidPrivateKeyEncoding,
}

impl Config {
    /// Parse and validate configuration.
    pub fn init() -> anyhow::Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;
        if self.sheets_range.trim().is_empty() {
            return Err(ConfigError::EmptyRange);
        }
        self.resolved_private_key()?;
        Ok(())
    }

    /// Parsed listen address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_address
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddress(self.listen_address.clone()))
    }

    /// PEM key from the base64 variable, or from the escaped variable when unset.
    fn resolved_private_key(&self) -> Result<Option<SecretString>, ConfigError> {
        if let Some(encoded) = self
            .private_key_base64
            .as_ref()
            .map(|k| k.expose_secret().trim())
            .filter(|k| !k.is_empty())
        {
            // Wrapped output of `base64` splits lines at 76 columns
            let compact: String = encoded
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let bytes = KEY_ENGINE
                .decode(compact)
                .map_err(|_| ConfigError::InvalidPrivateKeyEncoding)?;
            let pem = String::from_utf8(bytes).map_err(|_| ConfigError::InvalidPrivateKeyEncoding)?;
            return Ok(Some(SecretString::from(pem)));
        }

        Ok(self
            .private_key
            .as_ref()
            .map(|k| SecretString::from(k.expose_secret().replace("\\n", "\n"))))
    }

    /// Settings for the dataset accessor.
    pub fn sheets_config(&self) -> Result<SheetsConfig, ConfigError> {
        Ok(SheetsConfig {
            spreadsheet_id: self.sheets_id.clone(),
            client_email: self.service_account_email.clone(),
            private_key: self.resolved_private_key()?,
            range: self.sheets_range.trim().to_string(),
        })
    }

    /// Settings for logging, tracing and error tracking.
    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.log_level.clone(),
            json_logs: self.json_logs,
            otlp_endpoint: self.otlp_endpoint.clone(),
            sentry_dsn: self.sentry_dsn.clone(),
            environment: self.environment.clone(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}
