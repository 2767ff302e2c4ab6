//! Board adapter: the surface that shows cards and reports clicks.
//!
//! `MatchGame` drives any `Board`. `MemoryBoard` is the headless
//! implementation used by tests and simulations.

pub mod adapter;
pub mod memory;

pub use adapter::Board;
pub use memory::{MemoryBoard, SlotState};
