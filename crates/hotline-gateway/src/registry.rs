// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live connection registry.
//!
//! Holds the open duplex connections, keyed by chat id and role. At most one
//! user connection and one admin connection are tracked per chat; registering
//! over an occupied key shuts the prior connection down. All mutations go
//! through one registry-wide mutex so no two operations against the same chat
//! interleave partially.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use hotline_core::{ChatId, ChatMessage, Role};

/// Frames pushed to a connection's writer task.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// A relayed chat message.
    Message(ChatMessage),
    /// An error report to the originating connection.
    Error { reason: String },
    /// Instructs the writer task to close the socket.
    Shutdown { reason: &'static str },
}

/// Sending half of a connection's bounded outbound queue.
pub type ConnectionHandle = mpsc::Sender<Outbound>;

#[derive(Debug)]
struct Registered {
    id: u64,
    handle: ConnectionHandle,
}

/// Registry of live connections, one per (chat, role) key.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<Mutex<HashMap<(ChatId, Role), Registered>>>,
    next_id: Arc<AtomicU64>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a connection for the given key, replacing and shutting down any
    /// prior handle so exactly one survives. Returns a registration id that
    /// must be passed back to [`remove`](Self::remove).
    pub async fn register(&self, chat_id: ChatId, role: Role, handle: ConnectionHandle) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut map = self.inner.lock().await;
        if let Some(prev) = map.insert((chat_id, role), Registered { id, handle }) {
            let _ = prev.handle.try_send(Outbound::Shutdown {
                reason: "replaced by a newer connection",
            });
            debug!(chat_id, %role, "registry: replaced existing connection");
        }
        id
    }

    /// The live handle for a key, if one is registered.
    pub async fn lookup(&self, chat_id: ChatId, role: Role) -> Option<ConnectionHandle> {
        let map = self.inner.lock().await;
        map.get(&(chat_id, role)).map(|r| r.handle.clone())
    }

    /// Drop the entry for a key, but only if it still belongs to registration
    /// `id`. A superseded connection's teardown must not evict its
    /// replacement.
    pub async fn remove(&self, chat_id: ChatId, role: Role, id: u64) {
        let mut map = self.inner.lock().await;
        if map.get(&(chat_id, role)).is_some_and(|r| r.id == id) {
            map.remove(&(chat_id, role));
            debug!(chat_id, %role, "registry: connection removed");
        }
    }

    /// Evict and shut down both connections of a chat. No-op when nothing is
    /// registered for it.
    pub async fn remove_all(&self, chat_id: ChatId) {
        let mut map = self.inner.lock().await;
        for role in [Role::User, Role::Admin] {
            if let Some(prev) = map.remove(&(chat_id, role)) {
                let _ = prev.handle.try_send(Outbound::Shutdown {
                    reason: "chat closed",
                });
                debug!(chat_id, %role, "registry: connection evicted on chat close");
            }
        }
    }

    /// Whether a key currently has a live handle.
    pub async fn contains(&self, chat_id: ChatId, role: Role) -> bool {
        let map = self.inner.lock().await;
        map.contains_key(&(chat_id, role))
    }
}
