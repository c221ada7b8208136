// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer credential verification (the authorization gate).
//!
//! Tokens are HS256 JWTs signed with a single process-wide secret. The
//! validation pins the algorithm, so a token signed with anything else is
//! rejected outright. A structurally valid token whose payload lacks a
//! non-zero subject or a usable role is rejected as incomplete even though
//! its signature checks out.

use std::time::Duration;

use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use hotline_core::{Claims, HotlineError, Role, UserId};

/// Raw claims as carried in the token payload.
///
/// `user_id` and `role` are decoded leniently so that a missing claim is
/// classified as incomplete rather than failing signature-stage decoding.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    user_id: UserId,
    #[serde(default)]
    role: String,
    exp: i64,
}

/// Verifies bearer credentials against the process-wide signing secret.
pub struct AuthGate {
    decoding: DecodingKey,
    validation: Validation,
}

impl AuthGate {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verify a credential and, when `required_role` is given, enforce an
    /// exact role match (no hierarchy).
    ///
    /// The credential may carry a `Bearer ` scheme prefix; it is stripped
    /// along with surrounding whitespace.
    pub fn authorize(
        &self,
        credential: Option<&str>,
        required_role: Option<Role>,
    ) -> Result<Claims, HotlineError> {
        let token = credential
            .map(strip_bearer)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| HotlineError::Unauthenticated("no token provided".to_string()))?;

        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| HotlineError::Unauthenticated(format!("invalid token: {e}")))?;
        let wire = data.claims;

        if wire.user_id == 0 {
            return Err(HotlineError::IncompleteClaims(
                "subject identifier missing".to_string(),
            ));
        }
        if wire.role.is_empty() {
            return Err(HotlineError::IncompleteClaims("role missing".to_string()));
        }
        let role: Role = wire.role.parse().map_err(|_| {
            HotlineError::IncompleteClaims(format!("unknown role `{}`", wire.role))
        })?;

        if let Some(required) = required_role
            && role != required
        {
            return Err(HotlineError::Forbidden {
                required,
                actual: role,
            });
        }

        debug!(user_id = wire.user_id, %role, "token accepted");
        Ok(Claims {
            user_id: wire.user_id,
            role,
            expires_at: wire.exp,
        })
    }
}

/// Mint a signed bearer token. Used by the CLI and tests; the backend itself
/// only ever verifies.
pub fn issue_token(
    secret: &str,
    user_id: UserId,
    role: Role,
    ttl: Duration,
) -> Result<String, HotlineError> {
    let claims = TokenClaims {
        user_id,
        role: role.to_string(),
        exp: chrono::Utc::now().timestamp() + ttl.as_secs() as i64,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| HotlineError::Internal(format!("failed to sign token: {e}")))
}

/// Pull the raw `Authorization` header value, if any.
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::AUTHORIZATION)?.to_str().ok()
}

fn strip_bearer(raw: &str) -> &str {
    let raw = raw.trim();
    raw.strip_prefix("Bearer ").map(str::trim).unwrap_or(raw)
}
