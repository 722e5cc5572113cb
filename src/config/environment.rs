// ABOUTME: Environment-based server configuration for the chat gateway
// ABOUTME: Loads .env via dotenvy and builds typed database, auth and completion settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! Environment-only configuration
//!
//! Every setting comes from a process environment variable, optionally seeded
//! from a `.env` file in the working directory. [`ServerConfig::from_vars`]
//! accepts any lookup function so the parsing rules can be exercised without
//! touching the real environment.

use anyhow::{Context, Result};
use chat_gateway_core::constants::{defaults, env_config};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

use super::secret;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Database file path
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string; bare paths are treated as `SQLite` files
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        let path_str = path_str.strip_prefix("//").unwrap_or(path_str);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(defaults::DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database configuration
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Where the `SQLite` database lives
    pub url: DatabaseUrl,
}

/// Token signing and session cookie settings
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign access tokens
    pub secret: String,
    /// Access token lifetime
    pub token_expiry_hours: i64,
    /// Name of the session cookie set on login
    pub cookie_name: String,
    /// Route clients post credentials to
    pub token_url: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .field("token_expiry_hours", &self.token_expiry_hours)
            .field("cookie_name", &self.cookie_name)
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// Settings injected into the completion client
#[derive(Clone)]
pub struct CompletionConfig {
    /// Bearer credential for the completion API
    pub api_key: String,
    /// API base URL without trailing slash
    pub base_url: String,
    /// Model used when a request leaves `model` empty
    pub default_model: String,
    /// Sampling temperature sent with every call
    pub temperature: f32,
    /// TCP connect timeout
    pub connect_timeout_secs: u64,
    /// Whole-request timeout
    pub request_timeout_secs: u64,
    /// Append `?stream=true` to the real completion call
    pub stream_query_param: bool,
}

impl CompletionConfig {
    /// Configuration pointing at an arbitrary base URL, used by tests and local proxies
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: defaults::OPENAI_BASE_URL.to_owned(),
            default_model: defaults::OPENAI_DEFAULT_MODEL.to_owned(),
            temperature: defaults::OPENAI_TEMPERATURE,
            connect_timeout_secs: defaults::OPENAI_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: defaults::OPENAI_REQUEST_TIMEOUT_SECS,
            stream_query_param: false,
        }
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("temperature", &self.temperature)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("stream_query_param", &self.stream_query_param)
            .finish()
    }
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Completion API configuration
    pub completion: CompletionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables, reading `.env` first when present
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if !load_dotenv(Path::new(defaults::DOTENV_FILE))? {
            info!("No {} file found, using process environment", defaults::DOTENV_FILE);
        }

        let config = Self::from_vars(|key| env::var(key).ok())?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let secret = match lookup(env_config::SECRET).filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None => {
                warn!(
                    "{} is not set; using an ephemeral secret, issued tokens will not survive a restart",
                    env_config::SECRET
                );
                secret::generate_secret()
            }
        };

        let config = Self {
            host: var_or(env_config::HOST, defaults::HOST),
            http_port: parse_var(&lookup, env_config::HTTP_PORT, defaults::HTTP_PORT)?,
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&var_or(
                    env_config::DATABASE_URL,
                    defaults::DATABASE_URL,
                )),
            },
            auth: AuthConfig {
                secret,
                token_expiry_hours: parse_var(
                    &lookup,
                    env_config::TOKEN_EXPIRY_HOURS,
                    defaults::TOKEN_EXPIRY_HOURS,
                )?,
                cookie_name: var_or(env_config::AUTH_COOKIE_NAME, defaults::AUTH_COOKIE_NAME),
                token_url: defaults::TOKEN_URL.to_owned(),
            },
            completion: CompletionConfig {
                api_key: var_or(env_config::OPENAI_API_KEY, ""),
                base_url: var_or(env_config::OPENAI_BASE_URL, defaults::OPENAI_BASE_URL)
                    .trim_end_matches('/')
                    .to_owned(),
                default_model: var_or(
                    env_config::OPENAI_DEFAULT_MODEL,
                    defaults::OPENAI_DEFAULT_MODEL,
                ),
                temperature: parse_var(
                    &lookup,
                    env_config::OPENAI_TEMPERATURE,
                    defaults::OPENAI_TEMPERATURE,
                )?,
                connect_timeout_secs: parse_var(
                    &lookup,
                    env_config::OPENAI_CONNECT_TIMEOUT_SECS,
                    defaults::OPENAI_CONNECT_TIMEOUT_SECS,
                )?,
                request_timeout_secs: parse_var(
                    &lookup,
                    env_config::OPENAI_REQUEST_TIMEOUT_SECS,
                    defaults::OPENAI_REQUEST_TIMEOUT_SECS,
                )?,
                stream_query_param: parse_var(
                    &lookup,
                    env_config::OPENAI_STREAM_QUERY_PARAM,
                    false,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error when a value is outside its accepted range
    pub fn validate(&self) -> Result<()> {
        if self.auth.token_expiry_hours <= 0 {
            anyhow::bail!("{} must be positive", env_config::TOKEN_EXPIRY_HOURS);
        }

        if !(0.0..=2.0).contains(&self.completion.temperature) {
            anyhow::bail!("{} must be between 0 and 2", env_config::OPENAI_TEMPERATURE);
        }

        if self.completion.api_key.is_empty() {
            warn!(
                "{} is not set; completion calls will be rejected upstream",
                env_config::OPENAI_API_KEY
            );
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Chat Gateway Configuration:\n\
             - Bind: {}:{}\n\
             - Database: {}\n\
             - Token expiry: {}h\n\
             - Session cookie: {}\n\
             - Completion API: {}\n\
             - Default model: {}\n\
             - Temperature: {}",
            self.host,
            self.http_port,
            self.database.url,
            self.auth.token_expiry_hours,
            self.auth.cookie_name,
            self.completion.base_url,
            self.completion.default_model,
            self.completion.temperature,
        )
    }
}

/// Parse a variable if present, otherwise return the default
fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {raw}")),
        None => Ok(default),
    }
}

/// Load a dotenv file into the process environment without overriding set variables
///
/// Returns `false` when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed
pub fn load_dotenv(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to load {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_database_url_parsing() {
        let file = DatabaseUrl::parse_url("sqlite:./test.db");
        assert_eq!(file.to_connection_string(), "sqlite:./test.db");
        assert!(!file.is_memory());

        assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());
        assert!(DatabaseUrl::parse_url("sqlite://:memory:").is_memory());

        let bare = DatabaseUrl::parse_url("./some/path.db");
        assert_eq!(
            bare,
            DatabaseUrl::SQLite {
                path: PathBuf::from("./some/path.db")
            }
        );
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = ServerConfig::from_vars(lookup_from(&[("SECRET", "abc")])).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.auth.secret, "abc");
        assert_eq!(config.auth.token_expiry_hours, 6);
        assert_eq!(config.auth.cookie_name, "oai");
        assert_eq!(config.auth.token_url, "/login");
        assert_eq!(config.completion.base_url, "https://api.openai.com/v1");
        assert!((config.completion.temperature - 0.8).abs() < f32::EPSILON);
        assert!(!config.completion.stream_query_param);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = ServerConfig::from_vars(lookup_from(&[
            ("SECRET", "abc"),
            ("HTTP_PORT", "9000"),
            ("OPENAI_BASE_URL", "http://localhost:1234/v1/"),
            ("OPENAI_TEMPERATURE", "0.2"),
            ("OPENAI_STREAM_QUERY_PARAM", "true"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]))
        .unwrap();

        assert_eq!(config.http_port, 9000);
        assert_eq!(config.completion.base_url, "http://localhost:1234/v1");
        assert!((config.completion.temperature - 0.2).abs() < f32::EPSILON);
        assert!(config.completion.stream_query_param);
        assert!(config.database.url.is_memory());
    }

    #[test]
    fn test_missing_secret_generates_ephemeral_one() {
        let config = ServerConfig::from_vars(lookup_from(&[])).unwrap();
        assert_eq!(config.auth.secret.len(), defaults::SECRET_BYTES * 2);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_port = ServerConfig::from_vars(lookup_from(&[("HTTP_PORT", "not-a-port")]));
        assert!(bad_port.unwrap_err().to_string().contains("HTTP_PORT"));

        let bad_expiry = ServerConfig::from_vars(lookup_from(&[("TOKEN_EXPIRY_HOURS", "0")]));
        assert!(bad_expiry.is_err());

        let bad_temperature =
            ServerConfig::from_vars(lookup_from(&[("OPENAI_TEMPERATURE", "3.5")]));
        assert!(bad_temperature.is_err());
    }

    #[test]
    fn test_debug_output_redacts_credentials() {
        let config = ServerConfig::from_vars(lookup_from(&[
            ("SECRET", "super-secret"),
            ("OPENAI_API_KEY", "sk-live-key"),
        ]))
        .unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("sk-live-key"));
        assert!(!config.summary().contains("sk-live-key"));
    }
}
