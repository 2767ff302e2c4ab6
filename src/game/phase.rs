//! Round phases.
//!
//! The phase carries the turn's selection inside it, so "two cards picked
//! but input still open" has no representation. Input is accepted exactly
//! in `Idle` and `AwaitingSecondFlip`.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::core::SlotIndex;

/// Slots flipped in the current turn (0, 1 or 2).
pub type Selection = SmallVec<[SlotIndex; 2]>;

/// Where a round currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Every card face-up for memorizing. Input locked.
    Previewing,
    /// Waiting for the first flip of a turn.
    Idle,
    /// One card flipped, waiting for its partner.
    AwaitingSecondFlip {
        /// The card already flipped this turn.
        first: SlotIndex,
    },
    /// Two cards up, comparison pending. Input locked.
    Resolving {
        /// First card flipped this turn.
        first: SlotIndex,
        /// Second card flipped this turn.
        second: SlotIndex,
    },
    /// Round finished, board concealed, next round pending. Input locked.
    Won,
}

impl Phase {
    /// Whether a flip can be accepted in this phase.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        matches!(self, Phase::Idle | Phase::AwaitingSecondFlip { .. })
    }

    /// The slots selected so far this turn, in flip order.
    #[must_use]
    pub fn selection(&self) -> Selection {
        match *self {
            Phase::AwaitingSecondFlip { first } => smallvec![first],
            Phase::Resolving { first, second } => smallvec![first, second],
            Phase::Previewing | Phase::Idle | Phase::Won => SmallVec::new(),
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Previewing => "previewing",
            Phase::Idle => "idle",
            Phase::AwaitingSecondFlip { .. } => "awaiting_second_flip",
            Phase::Resolving { .. } => "resolving",
            Phase::Won => "won",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
