//! Pure game logic for Wythoff's game.
//!
//! Two piles of tokens, two seats taking turns. A move removes a positive
//! count from pile 0, pile 1, or both piles at once; whoever empties the
//! last pile wins. Nothing here knows about sockets or locks.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod rules;
mod types;

pub use action::{Move, ParseMoveError, Target};
pub use rules::{LegalMove, MoveError, apply, validate};
pub use types::{Piles, Seat};
