//! Wythoff Games library - a two-player Wythoff's game server
//!
//! Two participants connect over TCP and take turns removing tokens from
//! two piles; whoever empties the last pile wins.
//!
//! # Architecture
//!
//! - **Coordinator**: the single locked choke point every move goes through
//! - **Notifier**: maps each outcome to the messages each seat receives
//! - **Shutdown**: idempotent teardown that flushes queued output first
//! - **Server**: TCP transport, one read-loop and one writer per seat
//! - **Client**: interactive terminal player
//!
//! # Example
//!
//! ```no_run
//! use wythoff_games::{GameServer, ServerConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default().with_port(5050);
//! let server = GameServer::bind(&config).await?;
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod client;
mod codec;
mod config;
mod coordinator;
mod error;
mod game;
pub mod notifier;
mod participant;
mod protocol;
mod server;
mod session;
mod shutdown;

// Crate-level exports - Framing
pub use codec::{MAX_LINE_LENGTH, Submission, SubmissionCodec};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Turn coordination
pub use coordinator::{Outcome, SessionClosed, TurnCoordinator};

// Crate-level exports - Errors
pub use error::TransportError;

// Crate-level exports - Running sessions
pub use game::GameSession;
pub use participant::{Inbox, Outbox, Participants, spawn_writer};
pub use session::{SessionPhase, SessionState};
pub use shutdown::{ShutdownCoordinator, ShutdownReason};

// Crate-level exports - Wire protocol
pub use protocol::{CLOSED_CUE, LOSS_CUE, RETRY_CUE, ServerMessage, WIN_CUE, YOUR_TURN_CUE};

// Crate-level exports - Server
pub use server::{GameServer, read_loop};

// Crate-level exports - Game rules
pub use wythoff_rules::{Move, MoveError, Piles, Seat};
