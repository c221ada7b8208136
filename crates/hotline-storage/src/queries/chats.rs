// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session CRUD operations.

use rusqlite::params;

use hotline_core::{ChatId, ChatSession, ChatStatus, HotlineError, UserId};

use crate::database::Database;
use crate::queries::parse_text_column;

fn row_to_chat(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatSession> {
    Ok(ChatSession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        status: parse_text_column(2, row.get::<_, String>(2)?)?,
        created_at: row.get(3)?,
    })
}

/// Create a new chat session with status `active` and return it.
pub async fn create_chat(
    db: &Database,
    user_id: UserId,
    created_at: &str,
) -> Result<ChatSession, HotlineError> {
    let created_at = created_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO chats (user_id, status, created_at) VALUES (?1, ?2, ?3)",
                params![user_id, ChatStatus::Active.to_string(), created_at],
            )?;
            Ok(ChatSession {
                id: conn.last_insert_rowid(),
                user_id,
                status: ChatStatus::Active,
                created_at,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a chat session by id.
pub async fn get_chat(db: &Database, id: ChatId) -> Result<Option<ChatSession>, HotlineError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, status, created_at FROM chats WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], row_to_chat);
            match result {
                Ok(chat) => Ok(Some(chat)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List chat sessions, optionally filtered by status, newest first.
pub async fn list_chats(
    db: &Database,
    status: Option<ChatStatus>,
) -> Result<Vec<ChatSession>, HotlineError> {
    db.connection()
        .call(move |conn| {
            let mut chats = Vec::new();
            match status {
                Some(filter) => {
                    let mut stmt = conn.prepare(
                        "SELECT id, user_id, status, created_at FROM chats
                         WHERE status = ?1 ORDER BY id DESC",
                    )?;
                    let rows = stmt.query_map(params![filter.to_string()], row_to_chat)?;
                    for row in rows {
                        chats.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT id, user_id, status, created_at FROM chats ORDER BY id DESC",
                    )?;
                    let rows = stmt.query_map([], row_to_chat)?;
                    for row in rows {
                        chats.push(row?);
                    }
                }
            }
            Ok(chats)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update a chat session's status.
pub async fn update_chat_status(
    db: &Database,
    id: ChatId,
    status: ChatStatus,
) -> Result<(), HotlineError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE chats SET status = ?1 WHERE id = ?2",
                params![status.to_string(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
