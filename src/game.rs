//! A running game: coordinator, outboxes and teardown bound together.

use crate::coordinator::{Outcome, SessionClosed, TurnCoordinator};
use crate::notifier;
use crate::participant::Participants;
use crate::protocol::ServerMessage;
use crate::session::SessionState;
use crate::shutdown::{ShutdownCoordinator, ShutdownReason};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};
use wythoff_rules::{Piles, Seat};

/// One game between exactly two bound participants.
///
/// Shared by `Arc` between both read-loops; all methods take `&self`.
#[derive(Debug)]
pub struct GameSession {
    coordinator: TurnCoordinator,
    participants: Participants,
    shutdown: ShutdownCoordinator,
}

impl GameSession {
    /// Creates a session over `piles` for two bound participants.
    pub fn new(piles: Piles, participants: Participants) -> Self {
        Self::with_coordinator(TurnCoordinator::new(piles), participants)
    }

    /// Creates a session around an existing coordinator.
    pub fn with_coordinator(coordinator: TurnCoordinator, participants: Participants) -> Self {
        Self {
            coordinator,
            participants,
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Announces the game and prompts whoever is on turn.
    #[instrument(skip(self))]
    pub fn start(&self) {
        let state = self.coordinator.snapshot();
        info!(piles = %state.piles(), "Game is starting");

        self.participants.broadcast(ServerMessage::GameStarting {
            piles: state.piles(),
        });
        self.participants.send(state.turn(), ServerMessage::YourTurn);
        self.participants.send(
            state.turn().opponent(),
            ServerMessage::TurnNotice { turn: state.turn() },
        );
        info!(turn = %state.turn(), "Waiting for first move");
    }

    /// Handles one line from `seat` and queues the resulting messages.
    ///
    /// # Errors
    ///
    /// Returns [`SessionClosed`] once the game is over; the caller should
    /// stop reading from `seat`.
    #[instrument(skip(self, raw), fields(seat = %seat))]
    pub fn submit(&self, seat: Seat, raw: &str) -> Result<Outcome, SessionClosed> {
        self.submit_raw(seat, Some(raw))
    }

    /// Handles a line from `seat` that could not be read as text.
    ///
    /// Rejected like any malformed move; the connection stays up.
    ///
    /// # Errors
    ///
    /// Returns [`SessionClosed`] once the game is over.
    #[instrument(skip(self), fields(seat = %seat))]
    pub fn submit_unreadable(&self, seat: Seat) -> Result<Outcome, SessionClosed> {
        self.submit_raw(seat, None)
    }

    fn submit_raw(&self, seat: Seat, raw: Option<&str>) -> Result<Outcome, SessionClosed> {
        // Queue under the session lock so each outbox sees outcomes in the
        // order the coordinator produced them.
        self.coordinator.submit_then(seat, raw, |outcome| {
            notifier::notify(&self.participants, &self.shutdown, seat, outcome)
        })
    }

    /// Handles `seat`'s connection closing or failing.
    ///
    /// If the game was still running the opponent wins by forfeit. If it had
    /// already ended, whoever ended it owns teardown and this does nothing.
    #[instrument(skip(self), fields(seat = %seat))]
    pub fn disconnect(&self, seat: Seat) {
        if self.coordinator.abandon() {
            info!("Player left mid-game");
            notifier::notify_forfeit(&self.participants, &self.shutdown, seat);
        }
    }

    /// Ends the session from the server side without a winner.
    #[instrument(skip(self))]
    pub fn abort(&self) {
        self.coordinator.abandon();
        self.shutdown
            .shutdown(&self.participants, ShutdownReason::Aborted);
    }

    /// Copy of the current session state.
    pub fn state(&self) -> SessionState {
        self.coordinator.snapshot()
    }

    /// Token cancelled once teardown begins.
    pub fn closed(&self) -> CancellationToken {
        self.shutdown.token()
    }

    /// True once teardown has begun.
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_shut_down()
    }
}
