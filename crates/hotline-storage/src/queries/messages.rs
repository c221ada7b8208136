// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat message CRUD operations.

use rusqlite::params;

use hotline_core::{ChatId, ChatMessage, HotlineError};

use crate::database::Database;
use crate::queries::parse_text_column;

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatMessage> {
    Ok(ChatMessage {
        chat_id: row.get(0)?,
        sender: parse_text_column(1, row.get::<_, String>(1)?)?,
        user_id: row.get(2)?,
        username: row.get(3)?,
        content: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Durably append a message.
pub async fn insert_message(db: &Database, msg: &ChatMessage) -> Result<(), HotlineError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (chat_id, sender, user_id, username, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    msg.chat_id,
                    msg.sender.to_string(),
                    msg.user_id,
                    msg.username,
                    msg.content,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Messages of a chat in insertion order.
pub async fn list_messages(
    db: &Database,
    chat_id: ChatId,
    limit: Option<i64>,
) -> Result<Vec<ChatMessage>, HotlineError> {
    db.connection()
        .call(move |conn| {
            let mut messages = Vec::new();
            match limit {
                Some(lim) => {
                    let mut stmt = conn.prepare(
                        "SELECT chat_id, sender, user_id, username, content, created_at
                         FROM messages WHERE chat_id = ?1 ORDER BY id ASC LIMIT ?2",
                    )?;
                    let rows = stmt.query_map(params![chat_id, lim], row_to_message)?;
                    for row in rows {
                        messages.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT chat_id, sender, user_id, username, content, created_at
                         FROM messages WHERE chat_id = ?1 ORDER BY id ASC",
                    )?;
                    let rows = stmt.query_map(params![chat_id], row_to_message)?;
                    for row in rows {
                        messages.push(row?);
                    }
                }
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
