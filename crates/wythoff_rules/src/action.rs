//! Move submissions as first-class values.
//!
//! A [`Move`] is what a participant asked for, parsed from their raw line
//! but not yet checked against the piles. Legality is decided separately
//! by [`crate::validate`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// A proposed move: take `count` tokens from the pile(s) named by `pile_index`.
///
/// Both fields are kept signed and unchecked so that a syntactically valid
/// but nonsensical move (`-1 3`, `0 -2`) survives parsing and is rejected
/// with a precise reason instead of a format error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 0 or 1 for a single pile, 2 for both piles.
    pub pile_index: i64,
    /// Number of tokens to remove.
    pub count: i64,
}

impl Move {
    /// Creates a new move.
    pub fn new(pile_index: i64, count: i64) -> Self {
        Self { pile_index, count }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.pile_index, self.count)
    }
}

/// The line was not exactly two whitespace-separated integers.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid input format.")]
pub struct ParseMoveError;

impl FromStr for Move {
    type Err = ParseMoveError;

    #[instrument(level = "trace")]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(pile), Some(count), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParseMoveError);
        };

        let pile_index = pile.parse::<i64>().map_err(|_| ParseMoveError)?;
        let count = count.parse::<i64>().map_err(|_| ParseMoveError)?;
        Ok(Self { pile_index, count })
    }
}

/// Which pile(s) a legal move draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Pile 0 only.
    First,
    /// Pile 1 only.
    Second,
    /// Both piles by the same count.
    Both,
}

impl Target {
    /// Maps a wire pile index to a target.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Target::First),
            1 => Some(Target::Second),
            2 => Some(Target::Both),
            _ => None,
        }
    }

    /// Pile indices touched by this target, in reporting order.
    pub fn piles(self) -> &'static [usize] {
        match self {
            Target::First => &[0],
            Target::Second => &[1],
            Target::Both => &[0, 1],
        }
    }
}
