// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! hotline - a support-chat relay backend.
//!
//! This is the binary entry point for the hotline server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod token;

use clap::{Parser, Subcommand};

/// hotline - a support-chat relay backend.
#[derive(Parser, Debug)]
#[command(name = "hotline", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the hotline gateway server.
    Serve,
    /// Mint a signed bearer token for development and testing.
    Token {
        /// Subject identifier to embed in the token.
        #[arg(long)]
        user_id: i64,
        /// Role claim: "user" or "admin".
        #[arg(long)]
        role: String,
        /// Token lifetime in seconds; defaults to auth.token_ttl_secs.
        #[arg(long)]
        ttl_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match hotline_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            hotline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Token {
            user_id,
            role,
            ttl_secs,
        }) => token::run_token(&config, user_id, &role, ttl_secs),
        None => {
            println!("hotline: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = hotline_config::load_config_from_str("")
            .expect("default config should be valid");
        assert_eq!(config.server.port, 8080);
    }
}
