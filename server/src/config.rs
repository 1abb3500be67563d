//! Server configuration module.
//!
//! This module provides configuration loading for the auth server from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `AUTH_ENV`: Deployment environment, `local`, `dev` or `prod` (default: `local`)
//! - `AUTH_LISTEN_PORT`: Port to listen on (default: `44044`)
//! - `AUTH_TOKEN_TTL_SECS`: Lifetime of issued tokens in seconds (required)
//! - `AUTH_REQUEST_TIMEOUT_SECS`: Per-request deadline in seconds (default: `10`)
//! - `AUTH_HASH_MEMORY_KIB`, `AUTH_HASH_ITERATIONS`, `AUTH_HASH_PARALLELISM`:
//!   Argon2 work factor (default: Argon2 recommended values)
//! - `AUTH_APPS`: Comma-separated `id:name:secret` entries (default: none)
//! - `AUTH_ADMIN_EMAILS`: Comma-separated admin emails (default: none)
//!
//! # Invariants
//!
//! - `token_ttl` and `request_timeout` are never zero
//! - Every configured app has a positive id, a unique id and a non-empty secret

use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::{App, HashParams, SigningKey};
use crate::types::AppId;

/// Deployment environment. Selects the log format and verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Human-readable logs at debug level.
    Local,
    /// JSON logs at debug level.
    Dev,
    /// JSON logs at info level.
    Prod,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(format!("'{other}' is not one of local, dev, prod")),
        }
    }
}

/// Server configuration.
///
/// Contains all configuration parameters needed to run the auth server.
///
/// # Post-conditions
///
/// When constructed via `from_env()` or `from_lookup()`:
/// - `token_ttl` and `request_timeout` are non-zero
/// - `apps` hold validated signing keys
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub environment: Environment,
    /// Port to listen on for WebSocket connections.
    pub listen_port: u16,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
    /// Deadline for a single request, including password hashing.
    pub request_timeout: Duration,
    pub hash_params: HashParams,
    /// Tenant applications served by this instance.
    pub apps: Vec<App>,
    /// Users registered under these emails report as admins.
    pub admin_emails: Vec<String>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

impl ConfigError {
    fn invalid(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 44044;
    /// Default per-request deadline in seconds.
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `AUTH_TOKEN_TTL_SECS` is not set
    /// - Any variable is set but not valid for its type
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as `from_env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("AUTH_ENV") {
            Some(value) => value
                .parse()
                .map_err(|message: String| ConfigError::invalid("AUTH_ENV", message))?,
            None => Environment::Local,
        };

        let listen_port = parse_or(&lookup, "AUTH_LISTEN_PORT", Self::DEFAULT_PORT)?;

        let token_ttl_secs: u64 = lookup("AUTH_TOKEN_TTL_SECS")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_TOKEN_TTL_SECS".to_string()))
            .and_then(|value| parse_value("AUTH_TOKEN_TTL_SECS", &value))?;
        let token_ttl = non_zero_secs("AUTH_TOKEN_TTL_SECS", token_ttl_secs)?;

        let request_timeout_secs = parse_or(
            &lookup,
            "AUTH_REQUEST_TIMEOUT_SECS",
            Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let request_timeout = non_zero_secs("AUTH_REQUEST_TIMEOUT_SECS", request_timeout_secs)?;

        let defaults = HashParams::default();
        let hash_params = HashParams {
            memory_kib: parse_or(&lookup, "AUTH_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "AUTH_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "AUTH_HASH_PARALLELISM", defaults.parallelism)?,
        };

        let apps = match lookup("AUTH_APPS") {
            Some(value) => parse_apps(&value)?,
            None => Vec::new(),
        };

        let admin_emails = lookup("AUTH_ADMIN_EMAILS")
            .map(|value| split_list(&value).map(str::to_string).collect())
            .unwrap_or_default();

        Ok(Self {
            environment,
            listen_port,
            token_ttl,
            request_timeout,
            hash_params,
            apps,
            admin_emails,
        })
    }
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(name, format!("'{value}' is not a valid number")))
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    lookup(name).map_or(Ok(default), |value| parse_value(name, &value))
}

fn non_zero_secs(name: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::invalid(name, "must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// Parse `id:name:secret` entries. The secret is everything after the second
/// colon, so it may itself contain colons.
fn parse_apps(value: &str) -> Result<Vec<App>, ConfigError> {
    const NAME: &str = "AUTH_APPS";

    let mut seen = HashSet::new();
    let mut apps = Vec::new();

    for entry in split_list(value) {
        let mut parts = entry.splitn(3, ':');
        let (Some(id), Some(name), Some(secret)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ConfigError::invalid(
                NAME,
                "entries must have the form id:name:secret",
            ));
        };

        let id: i32 = parse_value(NAME, id)?;
        if id <= 0 {
            return Err(ConfigError::invalid(
                NAME,
                format!("app id {id} must be positive"),
            ));
        }
        if !seen.insert(id) {
            return Err(ConfigError::invalid(NAME, format!("duplicate app id {id}")));
        }

        let signing = SigningKey::new_hs256(secret.as_bytes().to_vec())
            .map_err(|e| ConfigError::invalid(NAME, format!("app {id}: {e}")))?;

        apps.push(App {
            id: AppId(id),
            name: name.to_string(),
            signing,
        });
    }

    Ok(apps)
}
