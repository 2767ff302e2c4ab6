//! Error types.
//!
//! Guarded no-ops (a flip while input is locked, a flip on an open card)
//! are not errors; see `FlipResponse`. Everything here is either a
//! configuration mistake or a broken invariant.

use derive_more::{Display, Error};

use super::image::{ImageId, SlotIndex};

/// Error raised by the match engine.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MatchError {
    /// The image pool does not fill the board exactly (pool × 2 ≠ slots).
    #[display("pool of {pool_len} images needs {} slots, board has {slot_count}", pool_len * 2)]
    Configuration {
        /// Number of images in the pool.
        pool_len: usize,
        /// Number of slots the board exposes.
        slot_count: usize,
    },

    /// The image pool is empty.
    #[display("image pool is empty")]
    EmptyPool,

    /// The pool lists the same image twice, so it would appear four times.
    #[display("{_0} appears more than once in the image pool")]
    DuplicateImage(#[error(not(source))] ImageId),

    /// A flip was requested for a slot the board does not have.
    #[display("{_0} is not on the board")]
    UnknownSlot(#[error(not(source))] SlotIndex),

    /// The board has no image for a slot held in the current selection.
    #[display("board lost track of selected {_0}")]
    Desynchronized(#[error(not(source))] SlotIndex),
}

impl MatchError {
    /// True for errors caused by the game configuration rather than play.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MatchError::Configuration { .. } | MatchError::EmptyPool | MatchError::DuplicateImage(_)
        )
    }
}
