// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session lifecycle: open, list, close.

use std::sync::Arc;

use tracing::{debug, info};

use hotline_core::{ChatId, ChatSession, ChatStatus, ChatStore, HotlineError, UserId};

use crate::registry::ConnectionRegistry;

/// Creates chat sessions, lists active ones for admin operators, and closes
/// them, evicting any live connections on close.
pub struct ChatLifecycle {
    store: Arc<dyn ChatStore>,
    registry: ConnectionRegistry,
}

impl ChatLifecycle {
    pub fn new(store: Arc<dyn ChatStore>, registry: ConnectionRegistry) -> Self {
        Self { store, registry }
    }

    /// Open a new session for `user_id`.
    ///
    /// Not idempotent: every call creates a distinct session.
    pub async fn open(&self, user_id: UserId) -> Result<ChatSession, HotlineError> {
        let created_at = chrono::Utc::now().to_rfc3339();
        let chat = self.store.create_chat(user_id, &created_at).await?;
        info!(chat_id = chat.id, user_id, "chat opened");
        Ok(chat)
    }

    /// Sessions currently in the `active` state.
    pub async fn list_active(&self) -> Result<Vec<ChatSession>, HotlineError> {
        self.store.list_chats(Some(ChatStatus::Active)).await
    }

    /// Terminally transition a session to `inactive` and evict its
    /// connections. Closing an already-inactive session is a no-op.
    pub async fn close(&self, chat_id: ChatId) -> Result<(), HotlineError> {
        let chat = self
            .store
            .get_chat(chat_id)
            .await?
            .ok_or_else(|| HotlineError::NotFound(format!("chat {chat_id}")))?;

        if chat.status == ChatStatus::Inactive {
            debug!(chat_id, "chat already inactive");
            return Ok(());
        }

        self.store
            .update_chat_status(chat_id, ChatStatus::Inactive)
            .await?;
        self.registry.remove_all(chat_id).await;
        info!(chat_id, "chat closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::registry::Outbound;
    use crate::testing::MemStore;
    use hotline_core::Role;

    fn lifecycle() -> (ChatLifecycle, Arc<MemStore>, ConnectionRegistry) {
        let store = Arc::new(MemStore::new());
        let registry = ConnectionRegistry::new();
        (
            ChatLifecycle::new(store.clone(), registry.clone()),
            store,
            registry,
        )
    }

    #[tokio::test]
    async fn open_creates_active_session() {
        let (lifecycle, _store, _registry) = lifecycle();
        let chat = lifecycle.open(42).await.unwrap();
        assert_eq!(chat.user_id, 42);
        assert_eq!(chat.status, ChatStatus::Active);
    }

    #[tokio::test]
    async fn repeated_open_creates_distinct_sessions() {
        let (lifecycle, _store, _registry) = lifecycle();
        let a = lifecycle.open(1).await.unwrap();
        let b = lifecycle.open(1).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(lifecycle.list_active().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn close_is_terminal_and_filters_from_active_listing() {
        let (lifecycle, store, _registry) = lifecycle();
        let chat = lifecycle.open(1).await.unwrap();

        lifecycle.close(chat.id).await.unwrap();

        assert!(lifecycle.list_active().await.unwrap().is_empty());
        let stored = store.get_chat(chat.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ChatStatus::Inactive);

        // Closing again is a tolerated no-op.
        lifecycle.close(chat.id).await.unwrap();
    }

    #[tokio::test]
    async fn close_evicts_both_connections() {
        let (lifecycle, _store, registry) = lifecycle();
        let chat = lifecycle.open(1).await.unwrap();

        let (user_tx, mut user_rx) = mpsc::channel(4);
        let (admin_tx, mut admin_rx) = mpsc::channel(4);
        registry.register(chat.id, Role::User, user_tx).await;
        registry.register(chat.id, Role::Admin, admin_tx).await;

        lifecycle.close(chat.id).await.unwrap();

        assert!(!registry.contains(chat.id, Role::User).await);
        assert!(!registry.contains(chat.id, Role::Admin).await);
        assert!(matches!(
            user_rx.recv().await,
            Some(Outbound::Shutdown { .. })
        ));
        assert!(matches!(
            admin_rx.recv().await,
            Some(Outbound::Shutdown { .. })
        ));
    }

    #[tokio::test]
    async fn close_unknown_chat_is_not_found() {
        let (lifecycle, _store, _registry) = lifecycle();
        assert!(matches!(
            lifecycle.close(999).await,
            Err(HotlineError::NotFound(_))
        ));
    }
}
