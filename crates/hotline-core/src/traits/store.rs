// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence collaborator trait for chat sessions and messages.

use async_trait::async_trait;

use crate::error::HotlineError;
use crate::types::{ChatId, ChatMessage, ChatSession, ChatStatus, UserId};

/// Durable store for chat sessions and their messages.
///
/// The relay and lifecycle components call this synchronously and treat
/// failures as component-level errors. Implementations must provide
/// per-insert atomicity; callers assume but do not implement it.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Create a new chat session with status `active`.
    ///
    /// Repeated calls for the same user create distinct sessions.
    async fn create_chat(
        &self,
        user_id: UserId,
        created_at: &str,
    ) -> Result<ChatSession, HotlineError>;

    /// Fetch a session by id.
    async fn get_chat(&self, id: ChatId) -> Result<Option<ChatSession>, HotlineError>;

    /// List sessions, optionally filtered by status, newest first.
    async fn list_chats(
        &self,
        status: Option<ChatStatus>,
    ) -> Result<Vec<ChatSession>, HotlineError>;

    /// Update a session's status. Sessions are never physically deleted.
    async fn update_chat_status(
        &self,
        id: ChatId,
        status: ChatStatus,
    ) -> Result<(), HotlineError>;

    /// Durably append a message.
    async fn insert_message(&self, msg: &ChatMessage) -> Result<(), HotlineError>;

    /// Messages of a chat in chronological order.
    async fn list_messages(
        &self,
        chat_id: ChatId,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessage>, HotlineError>;
}
