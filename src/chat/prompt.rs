// ABOUTME: Prompt assembly for priming calls, new conversations and continued turns
// ABOUTME: Guarantees the AI: sentinel is never appended twice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use chat_gateway_core::constants::prompt::{AI_SENTINEL, USER_LABEL};

/// Prompt for the priming call that mints an upstream handle
#[must_use]
pub fn priming_prompt(ai_prompt: &str, user_prompt: &str) -> String {
    format!("\n{AI_SENTINEL} {ai_prompt}\n{USER_LABEL} {user_prompt}")
}

/// First assembled prompt of a new conversation
#[must_use]
pub fn opening_prompt(user_prompt: &str) -> String {
    format!("{user_prompt}\n{AI_SENTINEL}")
}

/// Append a user turn and the sentinel unless the prompt already ends with the sentinel
#[must_use]
pub fn append_user_turn(previous: &str, user_prompt: &str) -> String {
    if previous.ends_with(AI_SENTINEL) {
        previous.to_owned()
    } else {
        format!("{previous}\n{USER_LABEL}{user_prompt}\n{AI_SENTINEL}")
    }
}

/// Transcript stored after an exchange
#[must_use]
pub fn cumulative_transcript(assembled_prompt: &str, response_text: &str) -> String {
    format!("{assembled_prompt} {response_text}")
}
