//! In-memory board.
//!
//! Holds each slot's image, face and armed flag in plain vectors. Used by
//! headless hosts and by the tests; anything with a real screen implements
//! `Board` itself.

use serde::{Deserialize, Serialize};

use crate::core::{ImageId, SlotIndex};

use super::Board;

/// One card position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotState {
    /// Image bound this round.
    pub image: Option<ImageId>,
    /// Face-up.
    pub visible: bool,
    /// Accepting flip requests.
    pub armed: bool,
}

/// Board backed by a `Vec<SlotState>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBoard {
    slots: Vec<SlotState>,
}

impl MemoryBoard {
    /// Create a board with `slot_count` empty, face-down slots.
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![SlotState::default(); slot_count],
        }
    }

    /// State of one slot, if it exists.
    #[must_use]
    pub fn slot(&self, slot: SlotIndex) -> Option<&SlotState> {
        self.slots.get(slot.index())
    }

    /// All slots in board order.
    #[must_use]
    pub fn slots(&self) -> &[SlotState] {
        &self.slots
    }

    /// Whether the slot is currently accepting flips.
    #[must_use]
    pub fn is_armed(&self, slot: SlotIndex) -> bool {
        self.slot(slot).is_some_and(|s| s.armed)
    }

    /// Simulate a user click.
    ///
    /// Returns `true` if the slot is armed, meaning the host should forward
    /// the click to `MatchGame::handle_flip`.
    #[must_use]
    pub fn request_flip(&self, slot: SlotIndex) -> bool {
        self.is_armed(slot)
    }

    /// Images in board order (unassigned slots are skipped).
    #[must_use]
    pub fn layout(&self) -> Vec<ImageId> {
        self.slots.iter().filter_map(|s| s.image).collect()
    }

    /// Slots whose image equals `image`.
    #[must_use]
    pub fn slots_with(&self, image: ImageId) -> Vec<SlotIndex> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.image == Some(image))
            .map(|(i, _)| SlotIndex(i))
            .collect()
    }

    /// Remove a slot's image. Only useful for exercising error paths.
    pub fn clear_image(&mut self, slot: SlotIndex) {
        if let Some(s) = self.slots.get_mut(slot.index()) {
            s.image = None;
        }
    }

    fn slot_mut(&mut self, slot: SlotIndex) -> &mut SlotState {
        &mut self.slots[slot.index()]
    }
}

impl Board for MemoryBoard {
    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn assign_image(&mut self, slot: SlotIndex, image: ImageId) {
        self.slot_mut(slot).image = Some(image);
    }

    fn image_of(&self, slot: SlotIndex) -> Option<ImageId> {
        self.slot(slot).and_then(|s| s.image)
    }

    fn set_visible(&mut self, slot: SlotIndex, visible: bool) {
        self.slot_mut(slot).visible = visible;
    }

    fn is_visible(&self, slot: SlotIndex) -> bool {
        self.slot(slot).is_some_and(|s| s.visible)
    }

    fn arm_flip(&mut self, slot: SlotIndex) {
        self.slot_mut(slot).armed = true;
    }

    fn disarm_flip(&mut self, slot: SlotIndex) {
        self.slot_mut(slot).armed = false;
    }
}
