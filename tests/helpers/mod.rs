// ABOUTME: Shared test helpers for integration tests
// ABOUTME: Exports the Axum request/response harness and scripted collaborators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod axum_test;
pub mod scripted;
