//! # uwh - Underwater Hockey Game Clock
//!
//! The main binary for the uwh game clock.
//!
//! This application provides:
//! - CLI interface for setting up and running a match
//! - A terminal scoreboard with operator commands
//! - An optional read-only HTTP display feed (axum-based)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       apps/uwh (THE BINARY)                     │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐    │
//! │  │   CLI       │    │ Game Runner │    │  Display Feed    │    │
//! │  │  (clap)     │    │ (tick task) │    │  (axum, GET)     │    │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘    │
//! │         │                  │                    │              │
//! │         └──────────────────┼────────────────────┘              │
//! │                            ▼                                   │
//! │                    ┌───────────────┐                           │
//! │                    │   uwh-core    │                           │
//! │                    │ (THE LOGIC)   │                           │
//! │                    └───────────────┘                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Run a match from a setup file, with a display feed
//! uwh play --config match.toml --display-addr 127.0.0.1:8080
//!
//! # Rehearse a golden-goal match in seconds
//! uwh play --half 10 --half-time 2 --overtime "Golden Goal" --unit seconds
//!
//! # Validate a setup, list stored results
//! uwh check --config match.toml
//! uwh results --results results.json
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uwh::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing on stderr; stdout carries the scoreboard.
    // UWH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("UWH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "uwh=debug,uwh_core=debug,tower_http=debug"
    } else {
        "uwh=info,uwh_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the uwh startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗   ██╗██╗    ██╗██╗  ██╗
  ██║   ██║██║    ██║██║  ██║
  ██║   ██║██║ █╗ ██║███████║
  ██║   ██║██║███╗██║██╔══██║
  ╚██████╔╝╚███╔███╔╝██║  ██║
   ╚═════╝  ╚══╝╚══╝ ╚═╝  ╚═╝

  Underwater Hockey Game Clock v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
