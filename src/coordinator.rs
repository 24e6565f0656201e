//! Turn coordination: the single choke point every move passes through.
//!
//! Both read-loops submit through [`TurnCoordinator::submit_then`]. One call
//! holds the session lock for parsing, the turn check, validation, mutation
//! and the turn flip, so two submissions can never interleave and a stale
//! pile value is never acted on. The resulting messages are queued before
//! the lock is released; writing them to sockets happens elsewhere.

use crate::session::SessionState;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};
use wythoff_rules::{Move, MoveError, Piles, Seat};

/// What a single submission resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The line was not two integers. Nothing changed.
    MalformedMove,
    /// A well-formed move from the seat that is not on turn. Nothing changed.
    OutOfTurn,
    /// Right seat, well-formed, but against the rules. Nothing changed.
    IllegalMove(MoveError),
    /// Move applied; `turn` is now up.
    Continue {
        /// Seat to move next.
        turn: Seat,
        /// Piles after the move.
        piles: Piles,
    },
    /// Move applied and both piles are empty. The session is now inactive.
    Win {
        /// Seat that made the final move.
        winner: Seat,
        /// Final piles (always empty).
        piles: Piles,
    },
}

impl Outcome {
    /// True for the outcomes that leave the session untouched.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Outcome::MalformedMove | Outcome::OutOfTurn | Outcome::IllegalMove(_)
        )
    }
}

/// Submission reached a session that has already ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Session is no longer active")]
pub struct SessionClosed;

/// Owns the session state and serializes every access to it.
#[derive(Debug)]
pub struct TurnCoordinator {
    state: Mutex<SessionState>,
}

impl TurnCoordinator {
    /// Starts coordinating a new game over `piles`.
    #[instrument(fields(piles = %piles))]
    pub fn new(piles: Piles) -> Self {
        Self::with_state(SessionState::new(piles))
    }

    /// Coordinates an existing state, e.g. a mid-game position.
    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // Every critical section leaves the state consistent before it can
        // panic, so a poisoned lock still guards valid data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    /// Validates and applies one move submitted by `seat`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionClosed`] if the game has already ended or been
    /// abandoned; nothing is applied in that case.
    pub fn submit_move(&self, seat: Seat, raw: &str) -> Result<Outcome, SessionClosed> {
        self.submit_then(seat, Some(raw), |_| {})
    }

    /// Like [`TurnCoordinator::submit_move`], but runs `deliver` on the
    /// outcome before the session lock is released.
    ///
    /// `raw` is `None` for input that could not be read as a line of text;
    /// it is treated as malformed. Because `deliver` runs inside the critical
    /// section, messages it queues for a seat are ordered the same way the
    /// outcomes were produced. It must not block.
    ///
    /// # Errors
    ///
    /// Returns [`SessionClosed`] if the game has already ended; `deliver` is
    /// not called in that case.
    #[instrument(skip(self, deliver), fields(seat = %seat))]
    pub fn submit_then<F>(
        &self,
        seat: Seat,
        raw: Option<&str>,
        deliver: F,
    ) -> Result<Outcome, SessionClosed>
    where
        F: FnOnce(&Outcome),
    {
        let mut state = self.lock();
        let outcome = decide(&mut state, seat, raw)?;
        deliver(&outcome);
        Ok(outcome)
    }

    /// Marks the session inactive without a winner.
    ///
    /// Returns `true` only for the call that actually ended the session, so
    /// a dropped connection racing a winning move is reported once.
    #[instrument(skip(self))]
    pub fn abandon(&self) -> bool {
        let mut state = self.lock();
        if !state.is_active() {
            return false;
        }
        state.deactivate();
        info!(piles = %state.piles(), "Session abandoned");
        true
    }
}

fn decide(
    state: &mut SessionState,
    seat: Seat,
    raw: Option<&str>,
) -> Result<Outcome, SessionClosed> {
    if !state.is_active() {
        debug!("Submission after session ended");
        return Err(SessionClosed);
    }

    let Some(raw) = raw else {
        warn!("Unreadable input");
        return Ok(Outcome::MalformedMove);
    };

    let mv: Move = match raw.parse() {
        Ok(mv) => mv,
        Err(e) => {
            warn!(raw, error = %e, "Malformed move");
            return Ok(Outcome::MalformedMove);
        }
    };

    if state.turn() != seat {
        warn!(%mv, expected = %state.turn(), "Move out of turn");
        return Ok(Outcome::OutOfTurn);
    }

    let legal = match wythoff_rules::validate(&state.piles(), mv) {
        Ok(legal) => legal,
        Err(reason) => {
            warn!(%mv, %reason, "Illegal move");
            return Ok(Outcome::IllegalMove(reason));
        }
    };

    wythoff_rules::apply(state.piles_mut(), legal);
    let piles = state.piles();

    if piles.is_empty() {
        state.deactivate();
        info!(%mv, winner = %seat, "Final move, game over");
        return Ok(Outcome::Win {
            winner: seat,
            piles,
        });
    }

    state.pass_turn();
    info!(%mv, %piles, next = %state.turn(), "Move accepted");
    Ok(Outcome::Continue {
        turn: state.turn(),
        piles,
    })
}
