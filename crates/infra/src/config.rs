//! Process configuration read from environment variables.
//!
//! | Variable                 | Default                  |
//! |--------------------------|--------------------------|
//! | `BIND_ADDR`              | `0.0.0.0:8080`           |
//! | `USER_TABLE`             | `interviewselect-users`  |
//! | `USE_PERSISTENT_STORES`  | `false`                  |
//! | `DATABASE_URL`           | required when persistent |
//! | `COGNITO_USER_POOL_ID`   | unset (deletion disabled)|
//! | `COGNITO_APP_CLIENT_ID`  | unset (sign-up disabled) |
//! | `IDENTITY_PROVIDER`      | `cognito` (or `memory`)  |
//! | `AWS_REGION`             | `us-east-1`              |
//! | `COGNITO_ENDPOINT`       | regional endpoint        |
//! | `AWS_ACCESS_KEY_ID`      | unset (deletion fails)   |
//! | `AWS_SECRET_ACCESS_KEY`  | required with key id     |
//! | `AWS_SESSION_TOKEN`      | unset                    |

use std::net::SocketAddr;

use thiserror::Error;

use interviewselect_auth::{AwsCredentials, CognitoOptions, IdentitySettings};

pub const DEFAULT_USER_TABLE: &str = "interviewselect-users";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Which identity provider backs registrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityBackend {
    #[default]
    Cognito,
    /// Process-local accounts, lost on restart. Development only.
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub user_table: String,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    pub identity: IdentitySettings,
    pub identity_backend: IdentityBackend,
    pub cognito: CognitoOptions,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "BIND_ADDR", value: raw })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let use_persistent_stores = match get("USE_PERSISTENT_STORES") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                key: "USE_PERSISTENT_STORES",
                value: raw,
            })?,
            None => false,
        };

        let database_url = get("DATABASE_URL");
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let identity_backend = match get("IDENTITY_PROVIDER").map(|v| v.to_ascii_lowercase()) {
            None => IdentityBackend::Cognito,
            Some(raw) => match raw.as_str() {
                "cognito" => IdentityBackend::Cognito,
                "memory" | "in-memory" => IdentityBackend::InMemory,
                _ => return Err(ConfigError::InvalidValue { key: "IDENTITY_PROVIDER", value: raw }),
            },
        };

        let credentials = match (get("AWS_ACCESS_KEY_ID"), get("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => Some(AwsCredentials {
                access_key_id,
                secret_access_key,
                session_token: get("AWS_SESSION_TOKEN"),
            }),
            (Some(_), None) => return Err(ConfigError::Missing("AWS_SECRET_ACCESS_KEY")),
            (None, Some(_)) => return Err(ConfigError::Missing("AWS_ACCESS_KEY_ID")),
            (None, None) => None,
        };

        let cognito = CognitoOptions {
            region: get("AWS_REGION").unwrap_or_else(|| CognitoOptions::default().region),
            endpoint: get("COGNITO_ENDPOINT"),
            credentials,
        };

        Ok(Self {
            bind_addr,
            user_table: get("USER_TABLE").unwrap_or_else(|| DEFAULT_USER_TABLE.to_string()),
            use_persistent_stores,
            database_url,
            identity: IdentitySettings {
                user_pool_id: get("COGNITO_USER_POOL_ID"),
                app_client_id: get("COGNITO_APP_CLIENT_ID"),
            },
            identity_backend,
            cognito,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
