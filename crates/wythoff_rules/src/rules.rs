//! Legality rules and move application.

use super::action::{Move, Target};
use super::types::Piles;
use serde::Serialize;
use tracing::{debug, instrument};

/// Why a well-formed move was refused.
///
/// The display text is shown to the participant verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// Count was zero or negative.
    #[display("count must be positive")]
    CountNotPositive,

    /// Pile index outside {0, 1, 2}.
    #[display("invalid pile index")]
    InvalidPileIndex,

    /// The named pile holds fewer tokens than requested.
    #[display("not enough objects in pile {}", _0)]
    NotEnoughObjects(#[error(not(source))] usize),
}

/// A move that passed [`validate`] against a particular set of piles.
///
/// Only [`validate`] can build one, so [`apply`] never underflows. It can
/// be serialized for logging, but not deserialized:
///
/// ```compile_fail
/// fn from_wire<T: serde::de::DeserializeOwned>() {}
/// from_wire::<wythoff_rules::LegalMove>();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LegalMove {
    target: Target,
    count: u32,
}

impl LegalMove {
    /// Pile(s) the move draws from.
    pub fn target(&self) -> Target {
        self.target
    }

    /// Tokens removed from each addressed pile.
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Checks `mv` against `piles`.
///
/// Reasons are reported in a fixed order: non-positive count first, then a
/// bad pile index, then the first short pile (pile 0 before pile 1).
#[instrument(level = "debug", skip(piles), fields(piles = %piles))]
pub fn validate(piles: &Piles, mv: Move) -> Result<LegalMove, MoveError> {
    if mv.count <= 0 {
        return Err(MoveError::CountNotPositive);
    }

    let target = Target::from_index(mv.pile_index).ok_or(MoveError::InvalidPileIndex)?;

    for &pile in target.piles() {
        let available = piles.get(pile).unwrap_or_default();
        if mv.count > i64::from(available) {
            debug!(pile, available, count = mv.count, "Pile too small");
            return Err(MoveError::NotEnoughObjects(pile));
        }
    }

    // count <= some pile size, which is a u32
    let count = u32::try_from(mv.count).map_err(|_| MoveError::NotEnoughObjects(target.piles()[0]))?;
    Ok(LegalMove { target, count })
}

/// Removes the tokens named by a validated move.
#[instrument(level = "debug", skip(piles), fields(before = %piles))]
pub fn apply(piles: &mut Piles, mv: LegalMove) {
    for &pile in mv.target.piles() {
        piles.take(pile, mv.count);
    }
    debug!(after = %piles, "Move applied");
}
