// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the hotline support-chat backend.
//!
//! Provides the error taxonomy, domain types, and the persistence
//! collaborator trait shared by the storage and gateway crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HotlineError;
pub use traits::ChatStore;
pub use types::{ChatId, ChatMessage, ChatSession, ChatStatus, Claims, Role, UserId};
