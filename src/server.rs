// ABOUTME: HTTP server assembly merging route groups and tower-http middleware
// ABOUTME: Binds the configured address and serves until ctrl-c is received
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! HTTP server
//!
//! [`build_router`] is shared by the binary and the integration tests so both
//! exercise the same middleware stack.

use crate::resources::ServerResources;
use crate::routes::{AuthRoutes, ChatRoutes, HealthRoutes};
use anyhow::{Context, Result};
use axum::Router;
use http::{header, Method};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(ChatRoutes::routes(resources))
        .layer(setup_cors())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}

/// Serve the application on the configured host and port
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr = format!(
        "{}:{}",
        resources.config.host, resources.config.http_port
    );
    let app = build_router(resources);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
