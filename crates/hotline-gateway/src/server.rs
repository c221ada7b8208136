// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. Public health/metrics
//! routes bypass both authorization and admission control; everything else
//! passes through the admission limiter, with per-handler authorization.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use hotline_core::{ChatStore, HotlineError};

use crate::auth::AuthGate;
use crate::handlers;
use crate::lifecycle::ChatLifecycle;
use crate::limiter::{AdmissionLimiter, admission_middleware};
use crate::registry::ConnectionRegistry;
use crate::relay::ChatEvent;
use crate::ws;

/// State for unauthenticated health/metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Optional Prometheus metrics render function for /metrics.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Bearer credential verifier.
    pub auth: Arc<AuthGate>,
    /// Persistence collaborator.
    pub store: Arc<dyn ChatStore>,
    /// Session open/list/close operations.
    pub lifecycle: Arc<ChatLifecycle>,
    /// Live connection registry.
    pub registry: ConnectionRegistry,
    /// Ingestion handle into the relay task.
    pub relay_tx: mpsc::Sender<ChatEvent>,
    /// Health state for unauthenticated endpoints.
    pub health: HealthState,
}

/// Gateway server bind configuration (mirrors the `[server]` config section
/// to avoid a dependency on the config crate from this crate).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Assemble the full router.
pub fn build_router(state: GatewayState, limiter: AdmissionLimiter) -> Router {
    // Unauthenticated public routes (health + metrics for probes and
    // Prometheus); also exempt from admission control.
    let public_routes = Router::new()
        .route("/health", get(handlers::get_public_health))
        .route("/metrics", get(handlers::get_public_metrics))
        .with_state(state.clone());

    // Everything else is admission-limited by originating address.
    // Authorization happens per handler: role requirements differ per route,
    // and the WebSocket handshake carries its credential in the query string.
    let limited_routes = Router::new()
        .route("/v1/chats", post(handlers::create_chat))
        .route("/v1/chats/active", get(handlers::list_active_chats))
        .route("/v1/chats/{id}/close", post(handlers::close_chat))
        .route("/v1/chats/{id}/messages", get(handlers::chat_history))
        .route("/ws", get(ws::ws_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            limiter,
            admission_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(limited_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process exits.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    limiter: AdmissionLimiter,
) -> Result<(), HotlineError> {
    let app = build_router(state, limiter);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HotlineError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    info!("gateway listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| HotlineError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
