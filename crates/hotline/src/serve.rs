// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hotline serve` command implementation.
//!
//! Wires the SQLite store, authorization gate, admission limiter, connection
//! registry, relay task, and lifecycle manager into the gateway server.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hotline_config::HotlineConfig;
use hotline_core::{ChatStore, HotlineError};
use hotline_gateway::{
    AdmissionLimiter, AuthGate, ChatLifecycle, ConnectionRegistry, GatewayState, HealthState,
    RelayConfig, ServerConfig, spawn_relay, start_server,
};
use hotline_storage::SqliteStore;

/// Runs the `hotline serve` command.
pub async fn run_serve(config: HotlineConfig) -> Result<(), HotlineError> {
    init_tracing(&config.server.log_level);

    info!("starting hotline serve");

    let Some(secret) = config
        .auth
        .secret
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    else {
        return Err(HotlineError::Config(
            "auth.secret must be set (hotline.toml or HOTLINE_AUTH_SECRET)".to_string(),
        ));
    };

    let prometheus_render = init_metrics();

    let store: Arc<dyn ChatStore> = Arc::new(SqliteStore::open(&config.storage).await?);
    info!(path = %config.storage.database_path, "storage ready");

    let registry = ConnectionRegistry::new();
    let limiter = AdmissionLimiter::new(
        config.limiter.max_requests,
        Duration::from_secs(config.limiter.window_secs),
    );
    let (relay_tx, _relay_handle) =
        spawn_relay(Arc::clone(&store), registry.clone(), RelayConfig::default());
    let lifecycle = Arc::new(ChatLifecycle::new(Arc::clone(&store), registry.clone()));

    let state = GatewayState {
        auth: Arc::new(AuthGate::new(secret)),
        store,
        lifecycle,
        registry,
        relay_tx,
        health: HealthState {
            start_time: std::time::Instant::now(),
            prometheus_render,
        },
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    start_server(&server_config, state, limiter).await
}

/// Initialize the tracing subscriber from the configured level, with
/// `RUST_LOG` taking precedence when set.
fn init_tracing(log_level: &str) {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("{log_level},hotline_gateway=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();
}

/// Install the Prometheus recorder and hand back its render closure for the
/// /metrics endpoint. Metrics are optional; failure to install only warns.
fn init_metrics() -> Option<Arc<dyn Fn() -> String + Send + Sync>> {
    match metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(Arc::new(move || handle.render())),
        Err(e) => {
            warn!(error = %e, "failed to install metrics recorder");
            None
        }
    }
}
