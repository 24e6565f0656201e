//! Server-to-participant messages and their wire text.
//!
//! Messages are typed values inside the server and only become text at the
//! transport boundary. The rendered text keeps the cue phrases below
//! verbatim; the bundled client (and any older client) keys off them.

use wythoff_rules::{MoveError, Piles, Seat};

/// Sent to the seat that should submit a move now.
pub const YOUR_TURN_CUE: &str = "It's your turn!";

/// Ends every rejection that expects a new move.
pub const RETRY_CUE: &str = "Please enter a valid move";

/// Final line of every message that precedes a close.
pub const CLOSED_CUE: &str = "Server has closed the connection";

/// Victory line.
pub const WIN_CUE: &str = "Congratulations! You win!";

/// Prefix of the defeat line.
pub const LOSS_CUE: &str = "Game over. Player";

/// A single message to one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Connection accepted and bound to a seat.
    Connected,
    /// Both seats bound; the game begins.
    GameStarting {
        /// Starting piles.
        piles: Piles,
    },
    /// Current pile sizes after an accepted move.
    PileState {
        /// Piles after the move.
        piles: Piles,
    },
    /// The recipient should move now.
    YourTurn,
    /// Someone else is on turn.
    TurnNotice {
        /// Seat on turn.
        turn: Seat,
    },
    /// The submitted line was not two integers.
    InvalidFormat,
    /// The recipient submitted while not on turn.
    NotYourTurn,
    /// The submitted move broke a rule.
    IllegalMove {
        /// Specific rule that was broken.
        reason: MoveError,
    },
    /// The recipient made the final move.
    Victory {
        /// Final piles.
        piles: Piles,
    },
    /// The opponent made the final move.
    Defeat {
        /// Seat that won.
        winner: Seat,
        /// Final piles.
        piles: Piles,
    },
    /// The opponent's connection dropped mid-game.
    OpponentLeft {
        /// Seat that disconnected.
        opponent: Seat,
    },
    /// Both seats are taken.
    SessionFull,
}

impl ServerMessage {
    /// True if the connection is closed right after this message.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ServerMessage::Victory { .. }
                | ServerMessage::Defeat { .. }
                | ServerMessage::OpponentLeft { .. }
                | ServerMessage::SessionFull
        )
    }
}

impl std::fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerMessage::Connected => write!(f, "Connected to server."),
            ServerMessage::GameStarting { piles } => {
                write!(f, "Game starting...\n---\nCurrent Piles: {piles}")
            }
            ServerMessage::PileState { piles } => write!(f, "---\nCurrent Piles: {piles}"),
            ServerMessage::YourTurn => write!(f, "{YOUR_TURN_CUE}"),
            ServerMessage::TurnNotice { turn } => write!(f, "It is Player {turn}'s turn."),
            ServerMessage::InvalidFormat => write!(
                f,
                "Received error from server: \"Invalid input format.\"\n{RETRY_CUE}."
            ),
            ServerMessage::NotYourTurn => write!(
                f,
                "Received error from server: \"It's not your turn.\"\nPlease wait for your turn."
            ),
            ServerMessage::IllegalMove { reason } => write!(
                f,
                "Received error from server: \"Illegal move: {reason}\"\n{RETRY_CUE}."
            ),
            ServerMessage::Victory { piles } => write!(
                f,
                "---\nCurrent Piles: {piles}\n{WIN_CUE}\n{CLOSED_CUE}."
            ),
            ServerMessage::Defeat { winner, piles } => write!(
                f,
                "---\nCurrent Piles: {piles}\n{LOSS_CUE} {winner} is the winner.\n{CLOSED_CUE}."
            ),
            ServerMessage::OpponentLeft { opponent } => write!(
                f,
                "Player {opponent} disconnected. You win by forfeit.\n{CLOSED_CUE}."
            ),
            ServerMessage::SessionFull => write!(f, "Game is full. {CLOSED_CUE}."),
        }
    }
}
