/*
 * Responsibility
 * - 環境変数の読み込み (起動時に一度だけ)
 * - 設定値のバリデーション (不正なら起動失敗)
 * - 読み込んだ値は AppState 経由で各コンポーネントに渡す
 */
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::BasicCredentials;
use crate::services::response::{Contract, envelope::RESERVED_KEYS};
use crate::services::validation::{SecondaryClaim, SecondaryClaimPolicy, ValidationPolicy};

const DEFAULT_ALLOWED_DOMAINS: &str = "fabrikam.com,fabricam.com";
const DEFAULT_ORGANIZATION: &str = "Contoso";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn from_value(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // None disables the access guard.
    pub basic_auth: Option<BasicCredentials>,

    pub policy: ValidationPolicy,
    pub contract: Contract,
    pub response_version: Option<String>,
    // Returned on Allow.
    pub return_claims: BTreeMap<String, String>,

    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_value(lookup("APP_ENV"));

        let basic_auth = match lookup("BASIC_AUTH_USERNAME").filter(|u| !u.is_empty()) {
            Some(username) => {
                let password = lookup("BASIC_AUTH_PASSWORD")
                    .ok_or(ConfigError::Missing("BASIC_AUTH_PASSWORD"))?;
                Some(BasicCredentials::new(username, password))
            }
            None => None,
        };

        let allowed_domains = lookup("ALLOWED_EMAIL_DOMAINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_DOMAINS.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        if allowed_domains.is_empty() {
            return Err(ConfigError::Invalid("ALLOWED_EMAIL_DOMAINS"));
        }

        let organization = lookup("ORGANIZATION_NAME")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string());

        let claim = match lookup("SECONDARY_CLAIM") {
            Some(v) => v
                .parse::<SecondaryClaim>()
                .map_err(|_| ConfigError::Invalid("SECONDARY_CLAIM"))?,
            None => SecondaryClaim::default(),
        };

        let required = match lookup("SECONDARY_CLAIM_REQUIRED") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("SECONDARY_CLAIM_REQUIRED"))?,
            None => true,
        };

        let min_length = lookup("SECONDARY_CLAIM_MIN_LENGTH")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(5);

        let contract = match lookup("RESPONSE_CONTRACT") {
            Some(v) => v
                .parse::<Contract>()
                .map_err(|_| ConfigError::Invalid("RESPONSE_CONTRACT"))?,
            None => Contract::default(),
        };

        let response_version = lookup("RESPONSE_VERSION")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let return_claims = parse_claims(&lookup("RETURN_CLAIMS").unwrap_or_default())?;

        let max_body_bytes = lookup("MAX_BODY_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        let request_timeout = lookup("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            addr,
            app_env,
            basic_auth,
            policy: ValidationPolicy {
                allowed_domains,
                organization,
                secondary: SecondaryClaimPolicy {
                    claim,
                    required,
                    min_length,
                },
            },
            contract,
            response_version,
            return_claims,
            max_body_bytes,
            request_timeout,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

// `key=value;key=value`
fn parse_claims(raw: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut claims = BTreeMap::new();

    for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or(ConfigError::Invalid("RETURN_CLAIMS"))?;
        let key = key.trim();
        if key.is_empty() || RESERVED_KEYS.contains(&key) {
            return Err(ConfigError::Invalid("RETURN_CLAIMS"));
        }
        claims.insert(key.to_string(), value.trim().to_string());
    }

    Ok(claims)
}
