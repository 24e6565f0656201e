//! Command-line interface for wythoff_games.

use clap::{Parser, Subcommand};

/// Wythoff's game over TCP - one server, two players
#[derive(Parser, Debug)]
#[command(name = "wythoff_games")]
#[command(about = "Two-player Wythoff's game server and client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Host a single game for the first two players to connect
    Server {
        /// Port to bind to
        port: Option<u16>,

        /// Starting size of pile 0 (default 5)
        pile0: Option<u32>,

        /// Starting size of pile 1 (default 10)
        pile1: Option<u32>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// TOML file with host, port, pile0 and pile1
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },

    /// Join a game as a player
    Client {
        /// Server address
        host: String,

        /// Server port
        port: u16,
    },
}
