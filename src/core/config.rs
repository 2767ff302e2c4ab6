//! Match configuration: image pool and transition delays.
//!
//! Defaults reproduce the classic four-pair board with a three second
//! preview, two seconds to look at a pair, and one second between rounds.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::MatchError;
use super::image::ImageId;

/// Configuration for a match session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Images in play. Each one is dealt onto exactly two slots.
    /// Length is the number of pairs to find.
    pub pool: Vec<ImageId>,

    /// How long every card stays face-up at the start of a round (ms).
    pub preview_delay_ms: u64,

    /// How long two flipped cards stay up before they are compared (ms).
    pub resolution_delay_ms: u64,

    /// Pause between a win and the next round's preview (ms).
    pub restart_delay_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            pool: [102, 16, 103, 7].into_iter().map(ImageId).collect(),
            preview_delay_ms: 3000,
            resolution_delay_ms: 2000,
            restart_delay_ms: 1000,
        }
    }
}

impl MatchConfig {
    /// Create a config with the given pool and default delays.
    pub fn new(pool: impl IntoIterator<Item = ImageId>) -> Self {
        Self {
            pool: pool.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the preview delay.
    #[must_use]
    pub fn with_preview_delay(mut self, delay: Duration) -> Self {
        self.preview_delay_ms = duration_ms(delay);
        self
    }

    /// Set the resolution delay.
    #[must_use]
    pub fn with_resolution_delay(mut self, delay: Duration) -> Self {
        self.resolution_delay_ms = duration_ms(delay);
        self
    }

    /// Set the restart delay.
    #[must_use]
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay_ms = duration_ms(delay);
        self
    }

    /// Number of pairs needed to win a round.
    #[must_use]
    pub fn pair_target(&self) -> usize {
        self.pool.len()
    }

    /// Number of slots this pool fills.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.pool.len() * 2
    }

    #[must_use]
    pub fn preview_delay(&self) -> Duration {
        Duration::from_millis(self.preview_delay_ms)
    }

    #[must_use]
    pub fn resolution_delay(&self) -> Duration {
        Duration::from_millis(self.resolution_delay_ms)
    }

    #[must_use]
    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    /// Check the pool against a board of `slot_count` slots.
    ///
    /// The pool must be non-empty, free of repeats, and fill the board
    /// exactly. Nothing is truncated or padded.
    pub fn validate(&self, slot_count: usize) -> Result<(), MatchError> {
        if self.pool.is_empty() {
            return Err(MatchError::EmptyPool);
        }

        let mut seen = HashSet::with_capacity(self.pool.len());
        if let Some(&dup) = self.pool.iter().find(|&&image| !seen.insert(image)) {
            return Err(MatchError::DuplicateImage(dup));
        }

        if self.slot_count() != slot_count {
            return Err(MatchError::Configuration {
                pool_len: self.pool.len(),
                slot_count,
            });
        }

        Ok(())
    }
}

fn duration_ms(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}
