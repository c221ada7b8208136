// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and non-zero budgets.

use crate::diagnostic::ConfigError;
use crate::model::HotlineConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HotlineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if let Some(secret) = &config.auth.secret
        && secret.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "auth.secret must not be empty when set".to_string(),
        });
    }

    if config.auth.token_ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "auth.token_ttl_secs must be at least 1".to_string(),
        });
    }

    if config.limiter.max_requests == 0 {
        errors.push(ConfigError::Validation {
            message: "limiter.max_requests must be at least 1".to_string(),
        });
    }

    if config.limiter.window_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "limiter.window_secs must be at least 1".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
