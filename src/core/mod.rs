//! Core types: image and slot identifiers, RNG, configuration, errors.
//!
//! Nothing here knows about turns or timers; the state machine in
//! `game` builds on these.

pub mod image;
pub mod rng;
pub mod config;
pub mod error;

pub use image::{ImageId, SlotIndex};
pub use rng::{GameRng, GameRngState};
pub use config::MatchConfig;
pub use error::MatchError;
