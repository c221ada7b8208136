// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the hotline support-chat backend.

use thiserror::Error;

use crate::types::Role;

/// The primary error type used across all hotline crates.
#[derive(Debug, Error)]
pub enum HotlineError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// The credential is absent, malformed, expired, or fails signature verification.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The credential verified but its payload lacks a usable subject or role.
    #[error("incomplete claims: {0}")]
    IncompleteClaims(String),

    /// The verified role does not match the role required by the operation.
    #[error("forbidden: required role {required}, token carries {actual}")]
    Forbidden { required: Role, actual: Role },

    /// The originating address exhausted its admission budget for the current window.
    #[error("rate limited")]
    RateLimited,

    /// The request payload could not be interpreted.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A referenced chat or user does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Persistence backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A relay destination could not be reached. Non-fatal, informational.
    #[error("routing failure: {0}")]
    Routing(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
