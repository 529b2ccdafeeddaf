//! Whodunit CLI and REST API entry point.
//!
//! Binary name: `whodunit`
//!
//! Parses CLI arguments, loads configuration and templates, then either
//! starts the REST API server (`serve`) or runs the interactive play client
//! against a running server (`play`).

mod cli;
mod http;
mod state;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use whodunit_infra::config::load_config;

use state::AppState;

#[derive(Parser)]
#[command(name = "whodunit", about = "A turn-limited murder-mystery interrogation game", version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the game API server
    Serve {
        /// Listening port (overrides config and the PORT env var)
        #[arg(long)]
        port: Option<u16>,
        /// Listening host (overrides config)
        #[arg(long)]
        host: Option<String>,
    },
    /// Play a session in the terminal against a running server
    Play {
        /// Base URL of the game server
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,whodunit=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port, host } => {
            let config = load_config(&cli.config).await?;
            let state = AppState::init(&config).await?;

            let port = port.unwrap_or_else(|| config.listen_port());
            let host = host.unwrap_or_else(|| config.host.clone());
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Whodunit API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {}",
                console::style(format!("Provider: {} - {}", config.provider, config.model)).dim()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Play { server } => {
            cli::play::run(&server).await?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
