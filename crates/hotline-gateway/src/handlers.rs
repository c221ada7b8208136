// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the chat REST API.
//!
//! Handles POST /v1/chats, GET /v1/chats/active, POST /v1/chats/{id}/close,
//! GET /v1/chats/{id}/messages, plus the public health/metrics endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use hotline_core::{ChatId, ChatMessage, ChatSession, ChatStatus, HotlineError, Role};

use crate::auth::bearer_from_headers;
use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Wrapper giving `HotlineError` an HTTP representation.
#[derive(Debug)]
pub struct ApiError(pub HotlineError);

impl From<HotlineError> for ApiError {
    fn from(err: HotlineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            HotlineError::Unauthenticated(_) | HotlineError::IncompleteClaims(_) => {
                StatusCode::UNAUTHORIZED
            }
            HotlineError::Forbidden { .. } => StatusCode::FORBIDDEN,
            HotlineError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            HotlineError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            HotlineError::NotFound(_) => StatusCode::NOT_FOUND,
            HotlineError::Routing(_) => StatusCode::BAD_GATEWAY,
            HotlineError::Config(_)
            | HotlineError::Storage { .. }
            | HotlineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

/// Response body for GET /v1/chats/active.
#[derive(Debug, Serialize)]
pub struct ActiveChatsResponse {
    pub chats: Vec<ChatSession>,
}

/// Response body for POST /v1/chats/{id}/close.
#[derive(Debug, Serialize)]
pub struct CloseChatResponse {
    pub chat_id: ChatId,
    pub status: ChatStatus,
}

/// Response body for GET /v1/chats/{id}/messages.
#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub messages: Vec<ChatMessage>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST /v1/chats
///
/// Opens a new support chat for the authenticated user. Repeated calls
/// create distinct sessions.
pub async fn create_chat(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state
        .auth
        .authorize(bearer_from_headers(&headers), Some(Role::User))?;
    let chat = state.lifecycle.open(claims.user_id).await?;
    Ok((StatusCode::CREATED, Json(chat)))
}

/// GET /v1/chats/active
///
/// Lists active support chats. Admin only.
pub async fn list_active_chats(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Json<ActiveChatsResponse>, ApiError> {
    state
        .auth
        .authorize(bearer_from_headers(&headers), Some(Role::Admin))?;
    let chats = state.lifecycle.list_active().await?;
    Ok(Json(ActiveChatsResponse { chats }))
}

/// POST /v1/chats/{id}/close
///
/// Terminally closes a chat and evicts its live connections. Admin only.
pub async fn close_chat(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(chat_id): Path<ChatId>,
) -> Result<Json<CloseChatResponse>, ApiError> {
    state
        .auth
        .authorize(bearer_from_headers(&headers), Some(Role::Admin))?;
    state.lifecycle.close(chat_id).await?;
    Ok(Json(CloseChatResponse {
        chat_id,
        status: ChatStatus::Inactive,
    }))
}

/// GET /v1/chats/{id}/messages
///
/// Chronological message history of a chat. Users may only read chats they
/// own; admins may read any. Unknown and foreign chats both read as absent.
pub async fn chat_history(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(chat_id): Path<ChatId>,
) -> Result<Json<ChatHistoryResponse>, ApiError> {
    let claims = state.auth.authorize(bearer_from_headers(&headers), None)?;

    let chat = state
        .store
        .get_chat(chat_id)
        .await?
        .ok_or_else(|| HotlineError::NotFound(format!("chat {chat_id}")))?;
    if claims.role == Role::User && chat.user_id != claims.user_id {
        return Err(ApiError(HotlineError::NotFound(format!("chat {chat_id}"))));
    }

    let messages = state.store.list_messages(chat_id, None).await?;
    Ok(Json(ChatHistoryResponse { messages }))
}

/// GET /health
///
/// Unauthenticated liveness endpoint.
pub async fn get_public_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /metrics
///
/// Unauthenticated Prometheus scrape endpoint; 404 when no exporter is
/// installed.
pub async fn get_public_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (StatusCode::OK, render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
