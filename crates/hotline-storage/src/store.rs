// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `ChatStore` collaborator trait.

use async_trait::async_trait;
use tracing::debug;

use hotline_config::model::StorageConfig;
use hotline_core::{
    ChatId, ChatMessage, ChatSession, ChatStatus, ChatStore, HotlineError, UserId,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed chat store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. Writes serialize through the database's single
/// background thread.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the database at the configured path and run migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, HotlineError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite chat store ready");
        Ok(Self { db })
    }

    /// Flush pending writes and checkpoint the WAL.
    pub async fn close(&self) -> Result<(), HotlineError> {
        self.db.close().await
    }
}

#[async_trait]
impl ChatStore for SqliteStore {
    async fn create_chat(
        &self,
        user_id: UserId,
        created_at: &str,
    ) -> Result<ChatSession, HotlineError> {
        queries::chats::create_chat(&self.db, user_id, created_at).await
    }

    async fn get_chat(&self, id: ChatId) -> Result<Option<ChatSession>, HotlineError> {
        queries::chats::get_chat(&self.db, id).await
    }

    async fn list_chats(
        &self,
        status: Option<ChatStatus>,
    ) -> Result<Vec<ChatSession>, HotlineError> {
        queries::chats::list_chats(&self.db, status).await
    }

    async fn update_chat_status(
        &self,
        id: ChatId,
        status: ChatStatus,
    ) -> Result<(), HotlineError> {
        queries::chats::update_chat_status(&self.db, id, status).await
    }

    async fn insert_message(&self, msg: &ChatMessage) -> Result<(), HotlineError> {
        queries::messages::insert_message(&self.db, msg).await
    }

    async fn list_messages(
        &self,
        chat_id: ChatId,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessage>, HotlineError> {
        queries::messages::list_messages(&self.db, chat_id, limit).await
    }
}
