// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `ChatStore` double for gateway unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;

use hotline_core::{
    ChatId, ChatMessage, ChatSession, ChatStatus, ChatStore, HotlineError, UserId,
};

pub(crate) struct MemStore {
    chats: Mutex<Vec<ChatSession>>,
    messages: Mutex<Vec<ChatMessage>>,
    next_id: AtomicI64,
    fail_inserts: AtomicBool,
}

impl MemStore {
    pub(crate) fn new() -> Self {
        Self {
            chats: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_inserts: AtomicBool::new(false),
        }
    }

    /// Make subsequent `insert_message` calls fail, simulating a broken store.
    pub(crate) fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Stored messages of a chat, in insertion order.
    pub(crate) async fn messages(&self, chat_id: ChatId) -> Vec<ChatMessage> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ChatStore for MemStore {
    async fn create_chat(
        &self,
        user_id: UserId,
        created_at: &str,
    ) -> Result<ChatSession, HotlineError> {
        let chat = ChatSession {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            status: ChatStatus::Active,
            created_at: created_at.to_string(),
        };
        self.chats.lock().unwrap().push(chat.clone());
        Ok(chat)
    }

    async fn get_chat(&self, id: ChatId) -> Result<Option<ChatSession>, HotlineError> {
        Ok(self
            .chats
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_chats(
        &self,
        status: Option<ChatStatus>,
    ) -> Result<Vec<ChatSession>, HotlineError> {
        Ok(self
            .chats
            .lock()
            .unwrap()
            .iter()
            .filter(|c| status.is_none_or(|s| c.status == s))
            .cloned()
            .collect())
    }

    async fn update_chat_status(
        &self,
        id: ChatId,
        status: ChatStatus,
    ) -> Result<(), HotlineError> {
        let mut chats = self.chats.lock().unwrap();
        let chat = chats
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| HotlineError::NotFound(format!("chat {id}")))?;
        chat.status = status;
        Ok(())
    }

    async fn insert_message(&self, msg: &ChatMessage) -> Result<(), HotlineError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(HotlineError::Storage {
                source: "simulated insert failure".into(),
            });
        }
        self.messages.lock().unwrap().push(msg.clone());
        Ok(())
    }

    async fn list_messages(
        &self,
        chat_id: ChatId,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessage>, HotlineError> {
        let all = self.messages(chat_id).await;
        Ok(match limit {
            Some(lim) => all.into_iter().take(lim as usize).collect(),
            None => all,
        })
    }
}
