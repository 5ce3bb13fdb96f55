//! EventDesk - browse, book and manage events from the terminal.
//!
//! Main entry point for the EventDesk CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use eventdesk_client::CancellationToken;

mod commands;
mod feedback;

use commands::{auth, bookings, config, events};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// EventDesk - browse, book and manage events
#[derive(Parser)]
#[command(name = "eventdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend API URL (default: http://localhost:5000/api)
    #[arg(long, global = true, env = "EVENTDESK_API_URL")]
    pub server: Option<String>,

    /// Use a named context from client.yaml
    #[arg(long, global = true)]
    pub context: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register, log in and out, show who is logged in
    Auth(auth::AuthArgs),

    /// Browse events; admins can create, update and delete them
    Events(events::EventsArgs),

    /// Book a seat at an event
    Book(bookings::BookArgs),

    /// List my bookings
    Bookings(bookings::BookingsArgs),

    /// Manage backend contexts
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "eventdesk=debug,eventdesk_client=debug,eventdesk_config=debug,info"
    } else {
        "eventdesk=info,eventdesk_client=info,warn"
    };

    let log_dir = eventdesk_config::logs_dir().unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "eventdesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "eventdesk=trace,eventdesk_client=trace,eventdesk_config=trace,info",
                )),
        )
        .init();

    // Ctrl-C drops whatever request is in flight
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("Interrupted");
                cancel.cancel();
            }
        });
    }

    let ctx = commands::Context {
        server: cli.server,
        context: cli.context,
        json_output: cli.json,
        verbose: cli.verbose,
        cancel,
    };

    let result = match cli.command {
        Commands::Auth(args) => auth::run(args, &ctx).await,
        Commands::Events(args) => events::run(args, &ctx).await,
        Commands::Book(args) => bookings::book(args, &ctx).await,
        Commands::Bookings(args) => bookings::list(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    };

    // Failures print as the bare message, the way the views word them
    if let Err(e) = result {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("{e:#}");
        drop(guard);
        std::process::exit(1);
    }
    Ok(())
}
