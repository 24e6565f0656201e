//! Shared session state for a single game.

use serde::Serialize;
use tracing::{info, instrument};
use wythoff_rules::{Piles, Seat};

/// Where a session is in its lifecycle.
///
/// `WaitingForPlayers` never has a [`SessionState`]: the state is only
/// built once both seats are bound. The server publishes the phase it is
/// in through [`crate::GameServer::phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Fewer than two participants connected.
    #[display("waiting for players")]
    WaitingForPlayers,
    /// Moves are being accepted.
    #[display("in progress")]
    InProgress,
    /// Terminal; no further moves are applied.
    #[display("game over")]
    GameOver,
}

/// The mutable record both read-loops contend for.
///
/// Only the coordinator mutates it, and only while holding its lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    piles: Piles,
    turn: Seat,
    active: bool,
}

impl SessionState {
    /// Creates the state for a freshly started game. Seat 0 moves first.
    #[instrument(fields(piles = %piles))]
    pub fn new(piles: Piles) -> Self {
        info!("Creating session state");
        Self {
            piles,
            turn: Seat::Zero,
            active: true,
        }
    }

    /// Current pile sizes.
    pub fn piles(&self) -> Piles {
        self.piles
    }

    /// Seat whose move is currently accepted. Meaningless once inactive.
    pub fn turn(&self) -> Seat {
        self.turn
    }

    /// False after game over or a transport failure.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Lifecycle phase derived from the state.
    pub fn phase(&self) -> SessionPhase {
        if self.active {
            SessionPhase::InProgress
        } else {
            SessionPhase::GameOver
        }
    }

    pub(crate) fn piles_mut(&mut self) -> &mut Piles {
        &mut self.piles
    }

    pub(crate) fn pass_turn(&mut self) {
        self.turn = self.turn.opponent();
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }
}
