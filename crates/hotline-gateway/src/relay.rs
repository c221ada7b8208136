// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chat relay: a single task draining the ingestion queue.
//!
//! For every event the relay durably records a message, resolves the
//! destination (user events route to the chat's admin connection and vice
//! versa), and attempts non-blocking delivery. A slow or absent counterpart
//! never stalls the loop; the durable record is the source of truth and an
//! offline party catches up through history on reconnect.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use hotline_core::{ChatId, ChatMessage, ChatStore, Role, UserId};

use crate::registry::{ConnectionRegistry, Outbound};

/// An inbound chat event as read off a connection.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    pub chat_id: ChatId,
    pub sender: Role,
    pub user_id: UserId,
    pub username: String,
    pub content: String,
}

/// Configuration for the relay task.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Capacity of the ingestion queue. Connection tasks block on enqueue
    /// when it fills, applying backpressure to their sockets.
    pub queue_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { queue_capacity: 256 }
    }
}

/// Spawn the relay task. Returns the ingestion handle connection tasks feed
/// events into, plus the task handle.
pub fn spawn_relay(
    store: Arc<dyn ChatStore>,
    registry: ConnectionRegistry,
    config: RelayConfig,
) -> (mpsc::Sender<ChatEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(config.queue_capacity);
    let handle = tokio::spawn(run_relay(rx, store, registry));
    (tx, handle)
}

async fn run_relay(
    mut rx: mpsc::Receiver<ChatEvent>,
    store: Arc<dyn ChatStore>,
    registry: ConnectionRegistry,
) {
    while let Some(event) = rx.recv().await {
        // An event without a chat identifier cannot be routed or recorded
        // against a session; drop it and keep serving.
        if event.chat_id <= 0 {
            warn!(sender = %event.sender, "relay: dropping event without chat identifier");
            metrics::counter!("hotline_relay_events_dropped_total").increment(1);
            continue;
        }

        let message = ChatMessage {
            chat_id: event.chat_id,
            sender: event.sender,
            user_id: event.user_id,
            username: event.username,
            content: event.content,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        // Durable record first; delivery is a separate, best-effort guarantee.
        if let Err(e) = store.insert_message(&message).await {
            error!(chat_id = message.chat_id, error = %e, "relay: failed to persist message");
            if let Some(origin) = registry.lookup(message.chat_id, message.sender).await {
                let _ = origin.try_send(Outbound::Error {
                    reason: "message could not be stored".to_string(),
                });
            }
            continue;
        }
        metrics::counter!("hotline_relay_messages_total").increment(1);

        let destination = message.sender.counterpart();
        match registry.lookup(message.chat_id, destination).await {
            Some(handle) => {
                // try_send keeps the relay from ever blocking on a stuck
                // destination; a full queue means the message is stored only.
                if handle.try_send(Outbound::Message(message.clone())).is_ok() {
                    metrics::counter!("hotline_relay_delivered_total").increment(1);
                } else {
                    debug!(
                        chat_id = message.chat_id,
                        %destination,
                        "relay: counterpart queue unavailable, message stored only"
                    );
                }
            }
            None => {
                debug!(
                    chat_id = message.chat_id,
                    %destination,
                    "relay: counterpart offline, message stored only"
                );
            }
        }
    }

    debug!("relay: ingestion queue closed, loop exiting");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::testing::MemStore;

    fn event(chat_id: ChatId, sender: Role, content: &str) -> ChatEvent {
        ChatEvent {
            chat_id,
            sender,
            user_id: if sender == Role::Admin { 99 } else { 1 },
            username: sender.to_string(),
            content: content.to_string(),
        }
    }

    /// With a paused clock, sleeping yields until every other task is idle,
    /// which guarantees the relay has drained its queue.
    async fn quiesce() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_to_counterpart_in_ingestion_order() {
        let store = Arc::new(MemStore::new());
        let registry = ConnectionRegistry::new();
        let (tx, _handle) = spawn_relay(store.clone(), registry.clone(), RelayConfig::default());

        let (admin_tx, mut admin_rx) = mpsc::channel(16);
        registry.register(1, Role::Admin, admin_tx).await;

        for content in ["first", "second", "third"] {
            tx.send(event(1, Role::User, content)).await.unwrap();
        }
        quiesce().await;

        for expected in ["first", "second", "third"] {
            let frame = admin_rx.try_recv().unwrap();
            match frame {
                Outbound::Message(msg) => {
                    assert_eq!(msg.content, expected);
                    assert_eq!(msg.sender, Role::User);
                }
                other => panic!("expected message frame, got {other:?}"),
            }
        }

        let stored = store.messages(1).await;
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].content, "first");
        assert_eq!(stored[2].content, "third");
    }

    #[tokio::test(start_paused = true)]
    async fn admin_events_route_to_user_connection() {
        let store = Arc::new(MemStore::new());
        let registry = ConnectionRegistry::new();
        let (tx, _handle) = spawn_relay(store.clone(), registry.clone(), RelayConfig::default());

        let (user_tx, mut user_rx) = mpsc::channel(16);
        registry.register(5, Role::User, user_tx).await;

        tx.send(event(5, Role::Admin, "hi")).await.unwrap();
        quiesce().await;

        match user_rx.try_recv().unwrap() {
            Outbound::Message(msg) => {
                assert_eq!(msg.sender, Role::Admin);
                assert_eq!(msg.content, "hi");
            }
            other => panic!("expected message frame, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn offline_counterpart_still_gets_durable_record() {
        let store = Arc::new(MemStore::new());
        let registry = ConnectionRegistry::new();
        let (tx, _handle) = spawn_relay(store.clone(), registry.clone(), RelayConfig::default());

        tx.send(event(7, Role::User, "hello")).await.unwrap();
        quiesce().await;

        let stored = store.messages(7).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].content, "hello");
        assert_eq!(stored[0].chat_id, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn event_without_chat_id_is_dropped_not_fatal() {
        let store = Arc::new(MemStore::new());
        let registry = ConnectionRegistry::new();
        let (tx, _handle) = spawn_relay(store.clone(), registry.clone(), RelayConfig::default());

        tx.send(event(0, Role::User, "lost")).await.unwrap();
        tx.send(event(3, Role::User, "kept")).await.unwrap();
        quiesce().await;

        assert!(store.messages(0).await.is_empty());
        let stored = store.messages(3).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].content, "kept");
    }

    #[tokio::test(start_paused = true)]
    async fn persistence_failure_reports_to_sender_and_loop_survives() {
        let store = Arc::new(MemStore::new());
        let registry = ConnectionRegistry::new();
        let (tx, _handle) = spawn_relay(store.clone(), registry.clone(), RelayConfig::default());

        let (user_tx, mut user_rx) = mpsc::channel(16);
        registry.register(2, Role::User, user_tx).await;

        store.set_fail_inserts(true);
        tx.send(event(2, Role::User, "doomed")).await.unwrap();
        quiesce().await;

        assert!(matches!(
            user_rx.try_recv().unwrap(),
            Outbound::Error { .. }
        ));
        assert!(store.messages(2).await.is_empty());

        // The loop keeps serving once the store recovers.
        store.set_fail_inserts(false);
        tx.send(event(2, Role::User, "recovered")).await.unwrap();
        quiesce().await;
        assert_eq!(store.messages(2).await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn support_flow_user_opens_chat_admin_arrives_later() {
        use crate::lifecycle::ChatLifecycle;

        let store = Arc::new(MemStore::new());
        let registry = ConnectionRegistry::new();
        let lifecycle = ChatLifecycle::new(store.clone(), registry.clone());
        let (tx, _handle) = spawn_relay(store.clone(), registry.clone(), RelayConfig::default());

        // User opens a chat and says hello with no admin connected yet.
        let chat = lifecycle.open(42).await.unwrap();
        let (user_tx, mut user_rx) = mpsc::channel(16);
        registry.register(chat.id, Role::User, user_tx).await;
        tx.send(event(chat.id, Role::User, "hello")).await.unwrap();
        quiesce().await;

        let stored = store.messages(chat.id).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].content, "hello");

        // The admin finds the chat in the active listing and replies live.
        let active = lifecycle.list_active().await.unwrap();
        assert!(active.iter().any(|c| c.id == chat.id));

        let (admin_tx, _admin_rx) = mpsc::channel(16);
        registry.register(chat.id, Role::Admin, admin_tx).await;
        tx.send(event(chat.id, Role::Admin, "hi")).await.unwrap();
        quiesce().await;

        match user_rx.try_recv().unwrap() {
            Outbound::Message(msg) => {
                assert_eq!(msg.sender, Role::Admin);
                assert_eq!(msg.content, "hi");
            }
            other => panic!("expected message frame, got {other:?}"),
        }
        assert_eq!(store.messages(chat.id).await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn after_registry_eviction_messages_persist_but_do_not_deliver() {
        let store = Arc::new(MemStore::new());
        let registry = ConnectionRegistry::new();
        let (tx, _handle) = spawn_relay(store.clone(), registry.clone(), RelayConfig::default());

        let (admin_tx, mut admin_rx) = mpsc::channel(16);
        registry.register(4, Role::Admin, admin_tx).await;
        registry.remove_all(4).await;

        // Drain the shutdown frame the eviction queued.
        assert!(matches!(
            admin_rx.recv().await,
            Some(Outbound::Shutdown { .. })
        ));

        tx.send(event(4, Role::User, "late")).await.unwrap();
        quiesce().await;

        assert_eq!(store.messages(4).await.len(), 1);
        assert!(admin_rx.try_recv().is_err(), "no live delivery after close");
    }
}
