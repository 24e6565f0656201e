//! Wythoff Games - unified CLI
//!
//! `server` hosts one game; `client` plays in it.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wythoff_games::{GameServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Server {
            port,
            pile0,
            pile1,
            host,
            config,
        } => {
            initialize_tracing("info,wythoff_games=debug");
            run_server(config, host, port, pile0, pile1).await
        }
        Command::Client { host, port } => {
            // Keep the terminal for the game itself unless asked otherwise.
            initialize_tracing("warn");
            wythoff_games::client::connect(&host, port).await?;
            Ok(())
        }
    }
}

/// Run the game server
#[instrument(skip_all)]
async fn run_server(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    pile0: Option<u32>,
    pile1: Option<u32>,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(pile0) = pile0 {
        config = config.with_pile0(pile0);
    }
    if let Some(pile1) = pile1 {
        config = config.with_pile1(pile1);
    }
    config.validate()?;

    info!(?config, "Starting Wythoff game server");
    let server = GameServer::bind(&config).await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    info!("Server exiting");
    Ok(())
}

fn initialize_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
