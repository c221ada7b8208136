// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the hotline workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier of a support-chat session.
pub type ChatId = i64;

/// Identifier of a registered account (end user or admin operator).
pub type UserId = i64;

/// Side of a support conversation.
///
/// Serialized lowercase on the wire and in the database (`"user"` / `"admin"`),
/// matching the role claim carried in bearer tokens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// The opposite side of the conversation: user messages route to the
    /// admin connection and vice versa.
    pub fn counterpart(self) -> Role {
        match self {
            Role::User => Role::Admin,
            Role::Admin => Role::User,
        }
    }
}

/// Lifecycle state of a chat session. The only transition is
/// `Active -> Inactive`; inactive sessions are never reopened.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ChatStatus {
    Active,
    Inactive,
}

/// Verified identity derived from a bearer credential.
///
/// Produced by the authorization gate; lives for one request or one
/// connection, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claims {
    pub user_id: UserId,
    pub role: Role,
    /// Unix timestamp after which the credential is no longer valid.
    pub expires_at: i64,
}

/// A support-chat session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: ChatId,
    /// The end user who opened the session.
    pub user_id: UserId,
    pub status: ChatStatus,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A single chat message. Immutable once created; append-only within a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub chat_id: ChatId,
    /// Which side authored the message.
    pub sender: Role,
    /// Account id of the author.
    pub user_id: UserId,
    /// Display name of the author as shown to the counterpart.
    pub username: String,
    pub content: String,
    /// ISO 8601 timestamp assigned when the message was durably recorded.
    pub created_at: String,
}
