// ABOUTME: Token signing secret generation and persistence into a .env file
// ABOUTME: Backs the create-secret CLI command and the ephemeral secret fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use anyhow::{Context, Result};
use chat_gateway_core::constants::{defaults, env_config};
use rand::RngCore;
use std::fs;
use std::path::Path;

/// Result of [`write_secret`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretWriteOutcome {
    /// A new secret was written
    Created,
    /// An existing secret was replaced
    Replaced,
    /// An existing secret was kept because overwrite was not requested
    Kept,
}

/// Generate a random hex-encoded signing secret
#[must_use]
pub fn generate_secret() -> String {
    let mut bytes = [0u8; defaults::SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Write `SECRET=<hex>` into the dotenv file at `path`
///
/// Other lines of an existing file are preserved. An existing secret is only
/// replaced when `overwrite` is set.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written
pub fn write_secret(path: &Path, overwrite: bool) -> Result<SecretWriteOutcome> {
    let prefix = format!("{}=", env_config::SECRET);

    let existing = if path.exists() {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        String::new()
    };

    let has_secret = existing.lines().any(|line| line.starts_with(&prefix));
    if has_secret && !overwrite {
        return Ok(SecretWriteOutcome::Kept);
    }

    let secret_line = format!("{prefix}{}", generate_secret());
    let mut lines: Vec<String> = existing
        .lines()
        .filter(|line| !line.starts_with(&prefix))
        .map(str::to_owned)
        .collect();
    lines.push(secret_line);

    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(if has_secret {
        SecretWriteOutcome::Replaced
    } else {
        SecretWriteOutcome::Created
    })
}
