//! Core domain types for Wythoff's game.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// One of the two seats at the table, in arrival order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    derive_more::Display,
)]
pub enum Seat {
    /// First participant to connect (moves first).
    #[display("0")]
    Zero,
    /// Second participant to connect.
    #[display("1")]
    One,
}

impl Seat {
    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::Zero => Seat::One,
            Seat::One => Seat::Zero,
        }
    }

    /// Returns the wire index of this seat (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Seat::Zero => 0,
            Seat::One => 1,
        }
    }

    /// Looks up a seat by wire index.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::Zero),
            1 => Some(Seat::One),
            _ => None,
        }
    }
}

/// The two token piles.
///
/// Sizes are unsigned, so a pile can never go negative; the only way to
/// shrink a pile is [`crate::apply`], which is called after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Piles {
    sizes: [u32; 2],
}

impl Piles {
    /// Creates piles with the given sizes.
    pub fn new(pile0: u32, pile1: u32) -> Self {
        Self {
            sizes: [pile0, pile1],
        }
    }

    /// Returns the size of pile `index` (0 or 1).
    pub fn get(&self, index: usize) -> Option<u32> {
        self.sizes.get(index).copied()
    }

    /// Returns both sizes in pile order.
    pub fn sizes(&self) -> [u32; 2] {
        self.sizes
    }

    /// True once both piles are exhausted.
    pub fn is_empty(&self) -> bool {
        self.sizes == [0, 0]
    }

    pub(crate) fn take(&mut self, index: usize, count: u32) {
        self.sizes[index] -= count;
    }
}

impl std::fmt::Display for Piles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.sizes[0], self.sizes[1])
    }
}
