// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hotline.toml` > `~/.config/hotline/hotline.toml`
//! > `/etc/hotline/hotline.toml` with environment variable overrides via the
//! `HOTLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HotlineConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hotline/hotline.toml` (system-wide)
/// 3. `~/.config/hotline/hotline.toml` (user XDG config)
/// 4. `./hotline.toml` (local directory)
/// 5. `HOTLINE_*` environment variables
pub fn load_config() -> Result<HotlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HotlineConfig::default()))
        .merge(Toml::file("/etc/hotline/hotline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("hotline/hotline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("hotline.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<HotlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HotlineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HotlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HotlineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that keys containing
/// underscores stay unambiguous: `HOTLINE_AUTH_TOKEN_TTL_SECS` must map to
/// `auth.token_ttl_secs`, not `auth.token.ttl.secs`.
fn env_provider() -> Env {
    Env::prefixed("HOTLINE_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: HOTLINE_LIMITER_MAX_REQUESTS -> "limiter_max_requests"
        let mapped = key
            .as_str()
            .replacen("server_", "server.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("limiter_", "limiter.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
