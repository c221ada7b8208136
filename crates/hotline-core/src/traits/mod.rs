// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.

pub mod store;

pub use store::ChatStore;
