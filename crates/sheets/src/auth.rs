//! Service-account OAuth: signs a JWT assertion and trades it for an access token.
//!
//! See <https://developers.google.com/identity/protocols/oauth2/service-account>.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::SheetsError;

/// OAuth token endpoint, also the assertion audience.
pub(crate) const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Read-only spreadsheet scope.
const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
/// Grant type for the JWT bearer flow.
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Maximum assertion lifetime accepted by the token endpoint.
const ASSERTION_TTL_MINUTES: i64 = 60;

/// Claims of the signed assertion.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl<'a> AssertionClaims<'a> {
    fn new(client_email: &'a str, now: DateTime<Utc>) -> Self {
        Self {
            iss: client_email,
            scope: READONLY_SCOPE,
            aud: TOKEN_URL,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ASSERTION_TTL_MINUTES)).timestamp(),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Sign an RS256 assertion with the service account's PEM private key.
pub(crate) fn sign_assertion(
    client_email: &str,
    private_key: &SecretString,
    now: DateTime<Utc>,
) -> Result<String, SheetsError> {
    let key = EncodingKey::from_rsa_pem(private_key.expose_secret().as_bytes())
        .map_err(|e| SheetsError::InvalidKey(e.to_string()))?;

    encode(
        &Header::new(Algorithm::RS256),
        &AssertionClaims::new(client_email, now),
        &key,
    )
    .map_err(|e| SheetsError::InvalidKey(e.to_string()))
}

/// Exchange a signed assertion for a bearer token.
pub(crate) async fn fetch_access_token(
    client: &Client,
    assertion: &str,
) -> Result<SecretString, SheetsError> {
    debug!("Requesting service account access token");

    let response = client
        .post(TOKEN_URL)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)])
        .send()
        .await
        .map_err(|e| SheetsError::Auth(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!(%status, %body, "Token endpoint rejected assertion");
        return Err(SheetsError::Auth(format!("{status}: {body}")));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| SheetsError::Auth(e.to_string()))?;

    Ok(SecretString::from(token.access_token))
}
