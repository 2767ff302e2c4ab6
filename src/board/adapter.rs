//! Board adapter trait.
//!
//! The board is whatever actually shows the cards: a web page, a terminal
//! grid, or the in-memory board used in tests. The game commands it and
//! never inspects how it draws anything.

use crate::core::{ImageId, SlotIndex};

/// Board adapter trait.
///
/// Hosts implement this for their rendering surface. `MatchGame` calls
/// these methods to drive every visible transition.
///
/// ## Implementation Notes
///
/// - Slot indices passed in are always `< slot_count()`
/// - `image_of`: Return `None` only if no image was ever assigned
/// - `arm_flip`: Start forwarding user clicks on this slot to
///   `MatchGame::handle_flip`; `disarm_flip` stops it
/// - The slot count must not change while a game owns the board
pub trait Board {
    /// Number of card positions on the board.
    fn slot_count(&self) -> usize;

    /// Bind an image to a slot for the current round.
    fn assign_image(&mut self, slot: SlotIndex, image: ImageId);

    /// Image currently bound to a slot.
    fn image_of(&self, slot: SlotIndex) -> Option<ImageId>;

    /// Turn a card face-up (`true`) or face-down (`false`).
    fn set_visible(&mut self, slot: SlotIndex, visible: bool);

    /// Whether a card is face-up.
    fn is_visible(&self, slot: SlotIndex) -> bool;

    /// Enable flip requests for a slot.
    fn arm_flip(&mut self, slot: SlotIndex);

    /// Disable flip requests for a slot.
    fn disarm_flip(&mut self, slot: SlotIndex);

    // === Convenience Methods ===

    /// Disable flip requests on every slot.
    fn clear_flip_handlers(&mut self) {
        for slot in SlotIndex::all(self.slot_count()) {
            self.disarm_flip(slot);
        }
    }

    /// Set every slot face-up or face-down.
    fn set_all_visible(&mut self, visible: bool) {
        for slot in SlotIndex::all(self.slot_count()) {
            self.set_visible(slot, visible);
        }
    }

    /// Count the slots currently face-up.
    fn visible_count(&self) -> usize {
        SlotIndex::all(self.slot_count())
            .filter(|&slot| self.is_visible(slot))
            .count()
    }
}
