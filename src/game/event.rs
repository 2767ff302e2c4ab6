//! Notifications from the game to its host.
//!
//! The game queues these as transitions happen; the host drains them and
//! decides how to present each one (a "you won" dialog, a sound, nothing).

use serde::{Deserialize, Serialize};

use crate::core::SlotIndex;

/// Something the host may want to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A fresh order was dealt and the preview began.
    RoundStarted {
        /// Round number within the session, starting at 1.
        round: u32,
    },
    /// Preview over, cards face-down, input open.
    PreviewEnded,
    /// A flip was accepted.
    CardFlipped {
        /// The card turned face-up.
        slot: SlotIndex,
    },
    /// The two flipped cards share an image and stay up.
    PairMatched {
        first: SlotIndex,
        second: SlotIndex,
    },
    /// The two flipped cards differ and were turned back down.
    PairMissed {
        first: SlotIndex,
        second: SlotIndex,
    },
    /// Every pair was found. Emitted once per round.
    RoundWon,
    /// Board cleared; the next round starts after the restart delay.
    SessionRestarted,
}

impl MatchEvent {
    /// Whether this is the win signal.
    #[must_use]
    pub fn is_win(&self) -> bool {
        matches!(self, MatchEvent::RoundWon)
    }
}
