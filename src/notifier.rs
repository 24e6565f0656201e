//! Turns coordinator outcomes into messages.

use crate::coordinator::Outcome;
use crate::participant::Participants;
use crate::protocol::ServerMessage;
use crate::shutdown::{ShutdownCoordinator, ShutdownReason};
use tracing::{debug, instrument};
use wythoff_rules::Seat;

/// A message addressed to one seat.
pub type Delivery = (Seat, ServerMessage);

/// Messages that `outcome` produces, in send order.
///
/// Rejections go only to the submitter. An accepted move broadcasts the
/// piles before the turn prompt and notice. A win sends one final message
/// to each side.
pub fn deliveries(submitter: Seat, outcome: &Outcome) -> Vec<Delivery> {
    match *outcome {
        Outcome::MalformedMove => vec![(submitter, ServerMessage::InvalidFormat)],
        Outcome::OutOfTurn => vec![(submitter, ServerMessage::NotYourTurn)],
        Outcome::IllegalMove(reason) => vec![(submitter, ServerMessage::IllegalMove { reason })],
        Outcome::Continue { turn, piles } => vec![
            (Seat::Zero, ServerMessage::PileState { piles }),
            (Seat::One, ServerMessage::PileState { piles }),
            (turn, ServerMessage::YourTurn),
            (turn.opponent(), ServerMessage::TurnNotice { turn }),
        ],
        Outcome::Win { winner, piles } => vec![
            (winner, ServerMessage::Victory { piles }),
            (winner.opponent(), ServerMessage::Defeat { winner, piles }),
        ],
    }
}

/// Sends the messages for `outcome`, then tears down on a win.
#[instrument(skip(participants, shutdown), fields(submitter = %submitter))]
pub fn notify(
    participants: &Participants,
    shutdown: &ShutdownCoordinator,
    submitter: Seat,
    outcome: &Outcome,
) {
    for (seat, msg) in deliveries(submitter, outcome) {
        participants.send(seat, msg);
    }

    if let Outcome::Win { winner, .. } = *outcome {
        debug!(%winner, "Final messages queued");
        shutdown.shutdown(participants, ShutdownReason::GameOver { winner });
    }
}

/// Tells the remaining seat it won by forfeit, then tears down.
///
/// Only the caller that actually ended the session should call this.
#[instrument(skip(participants, shutdown), fields(left = %left))]
pub fn notify_forfeit(participants: &Participants, shutdown: &ShutdownCoordinator, left: Seat) {
    participants.send(left.opponent(), ServerMessage::OpponentLeft { opponent: left });
    shutdown.shutdown(participants, ShutdownReason::Disconnected(left));
}
