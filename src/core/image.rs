//! Image and slot identifiers.
//!
//! Both are opaque newtypes. The engine never interprets an `ImageId`
//! beyond equality; the rendering layer decides what picture it names.

use serde::{Deserialize, Serialize};

/// Identifier of a pairable image asset.
///
/// Each image in the configured pool appears on exactly two slots per round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u32);

impl ImageId {
    /// Create a new image ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Image({})", self.0)
    }
}

impl From<u32> for ImageId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Position of one card on the board (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotIndex(pub usize);

impl SlotIndex {
    /// Create a new slot index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Iterate over every slot of a board with `slot_count` positions.
    pub fn all(slot_count: usize) -> impl Iterator<Item = SlotIndex> {
        (0..slot_count).map(SlotIndex)
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ImageId::new(102).to_string(), "Image(102)");
        assert_eq!(SlotIndex::new(3).to_string(), "Slot(3)");
    }

    #[test]
    fn test_all_slots() {
        let slots: Vec<_> = SlotIndex::all(4).collect();
        assert_eq!(slots, vec![SlotIndex(0), SlotIndex(1), SlotIndex(2), SlotIndex(3)]);
        assert_eq!(SlotIndex::all(0).count(), 0);
    }
}
