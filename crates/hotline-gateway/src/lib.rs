// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the hotline support-chat backend.
//!
//! Hosts the real-time core: the authorization gate every privileged call
//! passes through, the per-address admission limiter, the live connection
//! registry, the chat relay that fans messages to the paired counterpart,
//! and the chat lifecycle manager. Plain CRUD stays behind the `ChatStore`
//! collaborator; this crate owns the concurrency.

pub mod auth;
pub mod handlers;
pub mod lifecycle;
pub mod limiter;
pub mod registry;
pub mod relay;
pub mod server;
pub mod ws;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthGate, issue_token};
pub use lifecycle::ChatLifecycle;
pub use limiter::AdmissionLimiter;
pub use registry::ConnectionRegistry;
pub use relay::{ChatEvent, RelayConfig, spawn_relay};
pub use server::{GatewayState, HealthState, ServerConfig, start_server};
