//! HTTP Basic credential check (core logic).
//!
//! This module does not know about axum middleware. The middleware calls
//! `AccessGuard::check` and turns a failure into a 401.

use std::fmt;

use axum::http::{HeaderMap, header};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::{info, warn};

const BASIC_PREFIX: &str = "Basic ";

/// Expected username/password pair, loaded once from configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    username: String,
    password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

// Never print the password.
impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("missing Authorization header")]
    MissingHeader,
    #[error("Authorization header is not visible ASCII")]
    InvalidHeader,
    #[error("Authorization header must start with 'Basic '")]
    UnsupportedScheme,
    #[error("Basic credentials are not valid base64")]
    InvalidBase64,
    #[error("Basic credentials are not valid UTF-8")]
    InvalidUtf8,
    #[error("Basic credentials have no ':' separator")]
    MissingSeparator,
    #[error("Basic credentials do not match")]
    Mismatch,
}

/// Gate in front of the validation pipeline.
///
/// `None` credentials means authentication is switched off for this
/// deployment and every request is let through.
#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    credentials: Option<BasicCredentials>,
}

impl AccessGuard {
    pub fn new(credentials: Option<BasicCredentials>) -> Self {
        Self { credentials }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn authorize(&self, headers: &HeaderMap) -> bool {
        match self.check(headers) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "HTTP basic authentication validation failed");
                false
            }
        }
    }

    pub fn check(&self, headers: &HeaderMap) -> Result<(), GuardError> {
        let Some(expected) = &self.credentials else {
            info!("HTTP basic authentication is not set");
            return Ok(());
        };

        // Only the first Authorization header counts.
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(GuardError::MissingHeader)?
            .to_str()
            .map_err(|_| GuardError::InvalidHeader)?;

        let encoded = value
            .strip_prefix(BASIC_PREFIX)
            .ok_or(GuardError::UnsupportedScheme)?;

        let decoded = STANDARD
            .decode(encoded)
            .map_err(|_| GuardError::InvalidBase64)?;
        let decoded = String::from_utf8(decoded).map_err(|_| GuardError::InvalidUtf8)?;

        // Split on the first ':' so the password itself may contain one.
        let (username, password) = decoded
            .split_once(':')
            .ok_or(GuardError::MissingSeparator)?;

        if expected.matches(username, password) {
            Ok(())
        } else {
            Err(GuardError::Mismatch)
        }
    }
}
