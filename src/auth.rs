// ABOUTME: JWT-based user authentication with bcrypt password hashing
// ABOUTME: Issues HS256 access tokens and resolves them from bearer headers or the session cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! # Authentication
//!
//! Access tokens are HS256 JWTs signed with the configured secret. Clients may
//! present them either as `Authorization: Bearer <token>` or through the
//! session cookie set by `/login`.

use crate::config::AuthConfig;
use axum::http::{header, HeaderMap, HeaderValue};
use chat_gateway_core::errors::{AppError, AppResult};
use chat_gateway_core::models::User;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenExpired {
                expired_at,
                current_time,
            } => {
                let minutes = current_time.signed_duration_since(*expired_at).num_minutes();
                write!(
                    f,
                    "JWT token expired {minutes} minutes ago at {}",
                    expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match &error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            JwtValidationError::TokenInvalid { .. } => Self::auth_invalid(error.to_string()),
            JwtValidationError::TokenMalformed { .. } => Self::auth_malformed(error.to_string()),
        }
    }
}

/// `JWT` claims for user authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// Login name at the time of issue
    pub login_id: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Identity extracted from a valid access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User `ID`
    pub user_id: Uuid,
    /// Login name
    pub login_id: String,
}

/// Authentication manager for `JWT` tokens and session cookies
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
    cookie_name: String,
}

impl AuthManager {
    /// Create a new authentication manager
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            token_expiry_hours: config.token_expiry_hours,
            cookie_name: config.cookie_name.clone(),
        }
    }

    /// Generate an HS256 access token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            login_id: user.login_id.clone(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign access token: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token is expired, forged or malformed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below so the error can report when the token expired
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| Self::convert_jwt_error(&e))?
            .claims;

        let current_time = Utc::now();
        if current_time.timestamp() > claims.exp {
            let expired_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or(current_time);
            tracing::warn!(
                user_id = %claims.sub,
                expired_at = %expired_at.to_rfc3339(),
                "JWT token expired"
            );
            return Err(JwtValidationError::TokenExpired {
                expired_at,
                current_time,
            });
        }

        Ok(claims)
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;
        tracing::warn!("JWT token validation failed: {:?}", e);

        match e.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            ErrorKind::Utf8(utf8_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {utf8_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Resolve the caller from the `Authorization` header, falling back to the session cookie
    ///
    /// # Errors
    ///
    /// Returns `AUTH_REQUIRED` when no credential is present, otherwise the validation failure
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
        let token = if let Some(auth_header) = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        {
            auth_header
                .strip_prefix("Bearer ")
                .or_else(|| auth_header.strip_prefix("bearer "))
                .ok_or_else(|| AppError::auth_invalid("Authorization header must use Bearer"))?
                .trim()
                .to_owned()
        } else if let Some(token) = get_cookie_value(headers, &self.cookie_name) {
            token
        } else {
            return Err(AppError::auth_required());
        };

        let claims = self.validate_token(&token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::auth_malformed("Token subject is not a user id"))?;

        Ok(AuthenticatedUser {
            user_id,
            login_id: claims.login_id,
        })
    }

    /// `Set-Cookie` value carrying the access token
    ///
    /// # Errors
    ///
    /// Returns an error if the token contains bytes not allowed in a header
    pub fn session_cookie(&self, token: &str) -> AppResult<HeaderValue> {
        let max_age = self.token_expiry_hours * 3600;
        HeaderValue::from_str(&format!(
            "{}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}",
            self.cookie_name
        ))
        .map_err(|e| AppError::internal(format!("Invalid session cookie: {e}")))
    }
}

/// Read a cookie value from the `Cookie` headers
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
        .filter(|value| !value.is_empty())
}

/// Hash a password with bcrypt on a blocking worker
///
/// # Errors
///
/// Returns an error if hashing fails or the worker panics
pub async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))
}

/// Verify a password against a bcrypt hash on a blocking worker
///
/// # Errors
///
/// Returns an error if verification fails to run or the worker panics
pub async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verification error: {e}")))
}
