//! # memory-match
//!
//! Engine for a single-player memory match game: a grid of face-down
//! cards, each image on exactly two of them, flipped two at a time until
//! every pair is found.
//!
//! ## Design Principles
//!
//! 1. **Board-Agnostic**: The game commands a `Board` and never draws
//!    anything itself. Hosts plug in a web page, a terminal, or the
//!    bundled `MemoryBoard`.
//!
//! 2. **Explicit State**: One `Phase` enum holds the turn's selection, so
//!    illegal combinations (two cards picked with input still open) can't
//!    be built.
//!
//! 3. **Host-Driven Time**: Delays are timers on a virtual clock. The host
//!    calls `advance`; superseded timers are discarded by generation.
//!
//! ## Modules
//!
//! - `core`: Image and slot IDs, RNG, configuration, errors
//! - `board`: Board adapter trait and in-memory board
//! - `game`: Phases, timers, events, and the `MatchGame` state machine

pub mod core;
pub mod board;
pub mod game;

// Re-export commonly used types
pub use crate::core::{GameRng, GameRngState, ImageId, MatchConfig, MatchError, SlotIndex};

pub use crate::board::{Board, MemoryBoard, SlotState};

pub use crate::game::{
    FlipResponse, IgnoreReason, MatchEvent, MatchGame, Phase, Selection,
    Timer, TimerKind, TimerQueue,
};
