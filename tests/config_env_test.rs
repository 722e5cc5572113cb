// ABOUTME: Tests loading server configuration from the process environment
// ABOUTME: Serialized because environment variables are process-global
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chat_gateway::config::{load_dotenv, DatabaseUrl, ServerConfig};
use chat_gateway::constants::env_config;
use serial_test::serial;
use std::env;

const VARS: &[&str] = &[
    env_config::HOST,
    env_config::HTTP_PORT,
    env_config::DATABASE_URL,
    env_config::SECRET,
    env_config::TOKEN_EXPIRY_HOURS,
    env_config::AUTH_COOKIE_NAME,
    env_config::OPENAI_API_KEY,
    env_config::OPENAI_BASE_URL,
    env_config::OPENAI_DEFAULT_MODEL,
    env_config::OPENAI_TEMPERATURE,
    env_config::OPENAI_STREAM_QUERY_PARAM,
];

/// Restores the touched variables when dropped
struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn clear() -> Self {
        let saved = VARS.iter().map(|key| (*key, env::var(key).ok())).collect();
        for key in VARS {
            env::remove_var(key);
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }
}

#[test]
#[serial]
fn test_from_env_reads_process_variables() {
    let _guard = EnvGuard::clear();
    env::set_var(env_config::HTTP_PORT, "9191");
    env::set_var(env_config::DATABASE_URL, "sqlite::memory:");
    env::set_var(env_config::SECRET, "abc123");
    env::set_var(env_config::AUTH_COOKIE_NAME, "session");
    env::set_var(env_config::OPENAI_API_KEY, "sk-env");
    env::set_var(env_config::OPENAI_BASE_URL, "http://localhost:4000/v1/");
    env::set_var(env_config::OPENAI_DEFAULT_MODEL, "curie");

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, 9191);
    assert_eq!(config.database.url, DatabaseUrl::Memory);
    assert_eq!(config.auth.secret, "abc123");
    assert_eq!(config.auth.cookie_name, "session");
    assert_eq!(config.completion.api_key, "sk-env");
    assert_eq!(config.completion.base_url, "http://localhost:4000/v1");
    assert_eq!(config.completion.default_model, "curie");
}

#[test]
#[serial]
fn test_from_env_rejects_unparseable_port() {
    let _guard = EnvGuard::clear();
    env::set_var(env_config::SECRET, "abc123");
    env::set_var(env_config::HTTP_PORT, "not-a-port");

    let err = ServerConfig::from_env().unwrap_err();
    assert!(err.to_string().contains(env_config::HTTP_PORT));
}

#[test]
#[serial]
fn test_from_env_rejects_out_of_range_temperature() {
    let _guard = EnvGuard::clear();
    env::set_var(env_config::SECRET, "abc123");
    env::set_var(env_config::OPENAI_TEMPERATURE, "3.5");

    assert!(ServerConfig::from_env().is_err());
}

#[test]
#[serial]
fn test_missing_dotenv_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!load_dotenv(&dir.path().join(".env")).unwrap());
}

#[test]
#[serial]
fn test_malformed_dotenv_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "BROKEN LINE=1\n").unwrap();

    let err = load_dotenv(&path).unwrap_err();
    assert!(format!("{err:#}").contains(".env"));
}

#[test]
#[serial]
fn test_dotenv_file_does_not_override_process_variables() {
    let _guard = EnvGuard::clear();
    env::set_var(env_config::HTTP_PORT, "7001");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "HTTP_PORT=7002\nSECRET=from-file\n").unwrap();

    assert!(load_dotenv(&path).unwrap());
    assert_eq!(env::var(env_config::HTTP_PORT).unwrap(), "7001");
    assert_eq!(env::var(env_config::SECRET).unwrap(), "from-file");
}
