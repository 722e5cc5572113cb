// ABOUTME: Application constants organized by domain
// ABOUTME: Environment variable names, defaults and conversation prompt markers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! Constants shared between the server crate and its tests

/// Service naming used in logs
pub mod service_names {
    /// Name reported at startup and in structured logs
    pub const CHAT_GATEWAY: &str = "chat-gateway";
}

/// Environment variable names read by `ServerConfig::from_env`
pub mod env_config {
    /// Bind address
    pub const HOST: &str = "HOST";
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// `SQLite` connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Token signing secret
    pub const SECRET: &str = "SECRET";
    /// Token lifetime in hours
    pub const TOKEN_EXPIRY_HOURS: &str = "TOKEN_EXPIRY_HOURS";
    /// Session cookie name
    pub const AUTH_COOKIE_NAME: &str = "AUTH_COOKIE_NAME";
    /// Bearer credential for the completion API
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Completion API base URL
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Model used when a request leaves `model` empty
    pub const OPENAI_DEFAULT_MODEL: &str = "OPENAI_DEFAULT_MODEL";
    /// Sampling temperature
    pub const OPENAI_TEMPERATURE: &str = "OPENAI_TEMPERATURE";
    /// Connect timeout in seconds
    pub const OPENAI_CONNECT_TIMEOUT_SECS: &str = "OPENAI_CONNECT_TIMEOUT_SECS";
    /// Whole-request timeout in seconds
    pub const OPENAI_REQUEST_TIMEOUT_SECS: &str = "OPENAI_REQUEST_TIMEOUT_SECS";
    /// Send `?stream=true` on the real completion call
    pub const OPENAI_STREAM_QUERY_PARAM: &str = "OPENAI_STREAM_QUERY_PARAM";
}

/// Default configuration values
pub mod defaults {
    /// Bind address
    pub const HOST: &str = "127.0.0.1";
    /// HTTP listen port
    pub const HTTP_PORT: u16 = 8080;
    /// `SQLite` database file, created on first start
    pub const DATABASE_URL: &str = "sqlite:./data/chat_gateway.db";
    /// Token lifetime in hours
    pub const TOKEN_EXPIRY_HOURS: i64 = 6;
    /// Session cookie name
    pub const AUTH_COOKIE_NAME: &str = "oai";
    /// Login route advertised to clients
    pub const TOKEN_URL: &str = "/login";
    /// Completion API base URL
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    /// Model used when a request leaves `model` empty
    pub const OPENAI_DEFAULT_MODEL: &str = "davinci";
    /// Sampling temperature
    pub const OPENAI_TEMPERATURE: f32 = 0.8;
    /// Connect timeout in seconds
    pub const OPENAI_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Whole-request timeout in seconds
    pub const OPENAI_REQUEST_TIMEOUT_SECS: u64 = 120;
    /// Number of random bytes in a generated secret (hex encoded to twice this length)
    pub const SECRET_BYTES: usize = 24;
    /// File written by `create-secret`
    pub const DOTENV_FILE: &str = ".env";
}

/// Markers used when assembling completion prompts
pub mod prompt {
    /// Sentinel marking where the next generated turn begins
    pub const AI_SENTINEL: &str = "AI:";
    /// Speaker label for user turns
    pub const USER_LABEL: &str = "USER:";
}
