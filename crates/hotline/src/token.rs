// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hotline token` command implementation.
//!
//! Mints a signed bearer token against the configured secret so operators
//! can exercise the API without a separate identity service.

use std::time::Duration;

use hotline_config::HotlineConfig;
use hotline_core::{HotlineError, Role};

/// Runs the `hotline token` command, printing the token to stdout.
pub fn run_token(
    config: &HotlineConfig,
    user_id: i64,
    role: &str,
    ttl_secs: Option<u64>,
) -> Result<(), HotlineError> {
    let Some(secret) = config
        .auth
        .secret
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    else {
        return Err(HotlineError::Config(
            "auth.secret must be set (hotline.toml or HOTLINE_AUTH_SECRET)".to_string(),
        ));
    };

    let role: Role = role.parse().map_err(|_| {
        HotlineError::MalformedInput(format!("unknown role `{role}` (expected user or admin)"))
    })?;
    let ttl = Duration::from_secs(ttl_secs.unwrap_or(config.auth.token_ttl_secs));

    let token = hotline_gateway::issue_token(secret, user_id, role, ttl)?;
    println!("{token}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret() -> HotlineConfig {
        let mut config = HotlineConfig::default();
        config.auth.secret = Some("cli-secret".to_string());
        config
    }

    #[test]
    fn token_command_requires_secret() {
        let config = HotlineConfig::default();
        assert!(matches!(
            run_token(&config, 1, "user", None),
            Err(HotlineError::Config(_))
        ));
    }

    #[test]
    fn token_command_rejects_unknown_role() {
        let config = config_with_secret();
        assert!(matches!(
            run_token(&config, 1, "root", None),
            Err(HotlineError::MalformedInput(_))
        ));
    }

    #[test]
    fn token_command_accepts_both_roles() {
        let config = config_with_secret();
        assert!(run_token(&config, 1, "user", Some(60)).is_ok());
        assert!(run_token(&config, 2, "admin", None).is_ok());
    }
}
