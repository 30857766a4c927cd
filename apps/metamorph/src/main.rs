//! # Metamorph - Staged-Evolution Console Widget
//!
//! The main binary for the Metamorph evolution widget.
//!
//! This application provides:
//! - The interactive evolution widget (`run`)
//! - A catalog/timing summary (`status`, `catalog`)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                apps/metamorph (THE BINARY)                  │
//! │                                                             │
//! │  ┌──────────┐   ┌──────────────────┐   ┌────────────────┐  │
//! │  │   CLI    │   │    Controller     │   │ Surface/Audio  │  │
//! │  │  (clap)  │   │ (tokio, timed SM) │   │ (terminal I/O) │  │
//! │  └────┬─────┘   └────────┬──────────┘   └───────┬────────┘  │
//! │       │                  │                      │           │
//! │       └──────────────────┼──────────────────────┘           │
//! │                          ▼                                  │
//! │                ┌──────────────────┐                         │
//! │                │  metamorph-core  │                         │
//! │                │   (THE LOGIC)    │                         │
//! │                └──────────────────┘                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Run the widget interactively
//! metamorph run
//!
//! # Watch the full playthrough
//! metamorph run --auto
//!
//! # Inspect the stage ladder
//! metamorph catalog
//! metamorph status --json-mode
//! ```

use clap::Parser;
use metamorph::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — METAMORPH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("METAMORPH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "metamorph=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Metamorph startup banner.
fn print_banner() {
    println!(
        r#"
  ███╗   ███╗███████╗████████╗ █████╗ ███╗   ███╗ ██████╗ ██████╗ ██████╗ ██╗  ██╗
  ████╗ ████║██╔════╝╚══██╔══╝██╔══██╗████╗ ████║██╔═══██╗██╔══██╗██╔══██╗██║  ██║
  ██╔████╔██║█████╗     ██║   ███████║██╔████╔██║██║   ██║██████╔╝██████╔╝███████║
  ██║╚██╔╝██║██╔══╝     ██║   ██╔══██║██║╚██╔╝██║██║   ██║██╔══██╗██╔═══╝ ██╔══██║
  ██║ ╚═╝ ██║███████╗   ██║   ██║  ██║██║ ╚═╝ ██║╚██████╔╝██║  ██║██║     ██║  ██║
  ╚═╝     ╚═╝╚══════╝   ╚═╝   ╚═╝  ╚═╝╚═╝     ╚═╝ ╚═════╝ ╚═╝  ╚═╝╚═╝     ╚═╝  ╚═╝

  Staged-Evolution Widget v{}

  One trigger • One transition • No way back
"#,
        env!("CARGO_PKG_VERSION")
    );
}
