//! Deferred transitions on a virtual clock.
//!
//! The game never sleeps. It records what should happen and when, and the
//! host moves the clock forward with `MatchGame::advance`. Every timer is
//! tagged with the generation it was scheduled in; `invalidate` starts a
//! new generation, and timers from older ones are dropped when they fall due.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Transition a timer triggers when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// End of the preview: hide every card, open input.
    ConcealAll,
    /// Compare the two flipped cards.
    ResolveTurn,
    /// Shuffle, deal, and preview a fresh round.
    StartRound,
}

/// A scheduled transition.
///
/// Ordered by deadline, then by scheduling order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timer {
    /// Clock reading at which the timer fires.
    pub due: Duration,
    /// Tie-breaker for timers due at the same instant.
    pub seq: u64,
    /// Generation the timer was scheduled in.
    pub generation: u64,
    /// What to do.
    pub kind: TimerKind,
}

/// Pending timers plus the virtual clock.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    generation: u64,
    next_seq: u64,
    pending: BinaryHeap<Reverse<Timer>>,
}

impl TimerQueue {
    /// Create an empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Schedule `kind` to fire `delay` from now in the current generation.
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) -> Timer {
        let timer = Timer {
            due: self.now + delay,
            seq: self.next_seq,
            generation: self.generation,
            kind,
        };
        self.next_seq += 1;
        self.pending.push(Reverse(timer));
        timer
    }

    /// Start a new generation. Everything scheduled so far becomes stale.
    pub fn invalidate(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Earliest deadline among live timers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending
            .iter()
            .filter(|Reverse(t)| t.generation == self.generation)
            .map(|Reverse(t)| t.due)
            .min()
    }

    /// Number of live timers.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.pending
            .iter()
            .filter(|Reverse(t)| t.generation == self.generation)
            .count()
    }

    /// Pop the earliest live timer due at or before `until`.
    ///
    /// Moves the clock to the timer's deadline, so anything scheduled while
    /// handling it is measured from that instant. Stale timers met on the
    /// way are discarded.
    pub fn pop_due(&mut self, until: Duration) -> Option<Timer> {
        while let Some(Reverse(timer)) = self.pending.peek().copied() {
            if timer.due > until {
                return None;
            }
            self.pending.pop();
            if timer.due > self.now {
                self.now = timer.due;
            }
            if timer.generation != self.generation {
                trace!(?timer, current = self.generation, "discarding stale timer");
                continue;
            }
            return Some(timer);
        }
        None
    }

    /// Move the clock forward to `until` (never backwards).
    pub fn settle(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pops_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerKind::StartRound, ms(300));
        queue.schedule(TimerKind::ConcealAll, ms(100));
        queue.schedule(TimerKind::ResolveTurn, ms(200));

        let kinds: Vec<_> = std::iter::from_fn(|| queue.pop_due(ms(1000)).map(|t| t.kind)).collect();
        assert_eq!(
            kinds,
            vec![TimerKind::ConcealAll, TimerKind::ResolveTurn, TimerKind::StartRound]
        );
        assert_eq!(queue.now(), ms(300));
    }

    #[test]
    fn test_same_deadline_keeps_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerKind::StartRound, ms(50));
        queue.schedule(TimerKind::ConcealAll, ms(50));

        assert_eq!(queue.pop_due(ms(50)).map(|t| t.kind), Some(TimerKind::StartRound));
        assert_eq!(queue.pop_due(ms(50)).map(|t| t.kind), Some(TimerKind::ConcealAll));
    }

    #[test]
    fn test_not_due_yet() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerKind::ConcealAll, ms(100));

        assert!(queue.pop_due(ms(99)).is_none());
        assert_eq!(queue.now(), Duration::ZERO);
        assert_eq!(queue.next_deadline(), Some(ms(100)));
        assert!(queue.pop_due(ms(100)).is_some());
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn test_delay_measured_from_fire_time() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerKind::ConcealAll, ms(100));
        assert!(queue.pop_due(ms(500)).is_some());

        let timer = queue.schedule(TimerKind::ResolveTurn, ms(20));
        assert_eq!(timer.due, ms(120));
    }

    #[test]
    fn test_invalidate_discards_stale() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerKind::ResolveTurn, ms(100));
        assert_eq!(queue.live_count(), 1);

        assert_eq!(queue.invalidate(), 1);
        assert_eq!(queue.live_count(), 0);
        assert_eq!(queue.next_deadline(), None);

        queue.schedule(TimerKind::StartRound, ms(200));
        let fired = queue.pop_due(ms(1000)).unwrap();
        assert_eq!(fired.kind, TimerKind::StartRound);
        assert_eq!(fired.generation, 1);
        assert!(queue.pop_due(ms(1000)).is_none());
    }

    #[test]
    fn test_settle_never_rewinds() {
        let mut queue = TimerQueue::new();
        queue.settle(ms(40));
        queue.settle(ms(10));
        assert_eq!(queue.now(), ms(40));
    }
}
