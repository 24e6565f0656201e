//! Idempotent session teardown.

use crate::participant::Participants;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use wythoff_rules::Seat;

/// Why a session is being torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ShutdownReason {
    /// Both piles emptied.
    #[display("player {} won", winner)]
    GameOver {
        /// Seat that made the final move.
        winner: Seat,
    },
    /// A participant's connection closed or failed.
    #[display("player {} disconnected", _0)]
    Disconnected(Seat),
    /// The server itself is stopping.
    #[display("server stopping")]
    Aborted,
}

/// Tears a session down exactly once.
///
/// Teardown closes both outboxes, so each writer flushes what is already
/// queued and then closes its socket, and cancels the token the read-loops
/// select on.
#[derive(Debug, Default)]
pub struct ShutdownCoordinator {
    fired: AtomicBool,
    token: CancellationToken,
}

impl ShutdownCoordinator {
    /// Creates a coordinator that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token cancelled when teardown starts.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// True once [`ShutdownCoordinator::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Starts teardown. Returns `false` if it had already started, in
    /// which case nothing else happens.
    #[instrument(skip(self, participants), fields(%reason))]
    pub fn shutdown(&self, participants: &Participants, reason: ShutdownReason) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            debug!("Shutdown already in progress");
            return false;
        }

        let closed = participants.close_all();
        self.token.cancel();
        info!(closed, "Closing connections");
        true
    }
}
