//! Service-account authentication against Google's OAuth token endpoint.
//!
//! The key file is the JSON document downloaded from the cloud console. A
//! short-lived RS256 assertion signed with its private key is exchanged for a
//! bearer token used by the Sheets and Drive calls.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Fields of a service-account key file this tool needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Auth(format!("cannot read key file {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> AppResult<Self> {
        serde_json::from_str(content).map_err(|e| AppError::Auth(format!("invalid key file: {e}")))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(key: &ServiceAccountKey, scopes: &[String], now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: scopes.join(" "),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Sign the token request assertion with the key's RSA private key.
pub fn sign_assertion(key: &ServiceAccountKey, claims: &AssertionClaims) -> AppResult<String> {
    let encoding = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| AppError::Auth(format!("invalid private key: {e}")))?;

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    Ok(jsonwebtoken::encode(&header, claims, &encoding)?)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// An authenticated connection to the spreadsheet service.
#[derive(Debug, Clone)]
pub struct Session {
    http: Client,
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

/// Authenticate as the service account described by `key_file`.
pub fn authenticate(key_file: &Path, scopes: &[String]) -> AppResult<Session> {
    let key = ServiceAccountKey::from_file(key_file)?;
    let now = Utc::now();
    let claims = AssertionClaims::new(&key, scopes, now);
    let assertion = sign_assertion(&key, &claims)?;

    let http = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    log::debug!("requesting access token for {} at {}", key.client_email, key.token_uri);

    let resp = http
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .map_err(|e| AppError::Auth(format!("token endpoint unreachable: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(AppError::Auth(format!(
            "token request rejected (HTTP {}): {}",
            status.as_u16(),
            body.trim()
        )));
    }

    let token: TokenResponse = resp
        .json()
        .map_err(|e| AppError::Auth(format!("unexpected token response: {e}")))?;

    log::info!("authenticated as {}", key.client_email);

    Ok(Session {
        http,
        access_token: token.access_token,
        expires_at: token.expires_in.map(|s| now + Duration::seconds(s)),
    })
}
