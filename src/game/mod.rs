//! The round/turn state machine and its supporting pieces.
//!
//! - `phase`: where a round stands, selection included
//! - `timer`: generation-tagged deferred transitions on a virtual clock
//! - `event`: notifications for the host, including the win signal
//! - `session`: `MatchGame`, which ties them together over a `Board`

pub mod phase;
pub mod timer;
pub mod event;
pub mod session;

pub use phase::{Phase, Selection};
pub use timer::{Timer, TimerKind, TimerQueue};
pub use event::MatchEvent;
pub use session::{FlipResponse, IgnoreReason, MatchGame};
