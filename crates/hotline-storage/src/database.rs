// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. The `Database` struct IS the single writer; query modules accept
//! `&Database` and go through `connection().call()`. Do NOT create additional
//! `Connection` instances for writes.

use std::path::Path;
use std::time::Duration;

use tokio_rusqlite::Connection;
use tracing::debug;

use hotline_core::HotlineError;

/// Handle to the single SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, HotlineError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| HotlineError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path.to_owned())
            .await
            .map_err(|e| HotlineError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |c| {
            if wal_mode {
                c.pragma_update(None, "journal_mode", "WAL")?;
            }
            c.pragma_update(None, "synchronous", "NORMAL")?;
            c.pragma_update(None, "foreign_keys", "ON")?;
            c.busy_timeout(Duration::from_secs(5))?;
            crate::migrations::run_migrations(c)
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })?;
            Ok(())
        })
        .await
        .map_err(|e: tokio_rusqlite::Error<Box<dyn std::error::Error + Send + Sync>>| {
            let source: Box<dyn std::error::Error + Send + Sync> = match e {
                tokio_rusqlite::Error::Error(inner) => inner,
                tokio_rusqlite::Error::Close((_, err)) => Box::new(err),
                other => Box::<dyn std::error::Error + Send + Sync>::from(other.to_string()),
            };
            HotlineError::Storage { source }
        })?;

        debug!(path, wal_mode, "database opened and migrated");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and flush pending writes.
    pub async fn close(&self) -> Result<(), HotlineError> {
        self.conn
            .call(|c| {
                c.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Bridge a tokio-rusqlite error into the workspace error type.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> HotlineError {
    HotlineError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/data/hotline.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn migrations_create_expected_tables() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("schema.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        let tables = db
            .connection()
            .call(|c| {
                let mut stmt = c.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok::<_, rusqlite::Error>(names)
            })
            .await
            .unwrap();

        assert!(tables.contains(&"chats".to_string()));
        assert!(tables.contains(&"messages".to_string()));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();

        let db = Database::open(path, true).await.unwrap();
        db.close().await.unwrap();
        drop(db);

        // A second open must not re-apply migrations.
        let db = Database::open(path, true).await.unwrap();
        db.close().await.unwrap();
    }
}
