//! The match game state machine.
//!
//! ```text
//! Previewing ─(preview delay)─▶ Idle ─flip─▶ AwaitingSecondFlip ─flip─▶ Resolving
//!     ▲                           ▲                                        │
//!     │                           └──────── miss / match, pairs left ──────┤
//!     └──(restart delay)── Won ◀──────────── last pair matched ────────────┘
//! ```
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//! use memory_match::{Board, FlipResponse, ImageId, MatchConfig, MatchGame, MemoryBoard, Phase, SlotIndex};
//!
//! let config = MatchConfig::new([ImageId(1), ImageId(2)]);
//! let mut game = MatchGame::new(MemoryBoard::new(4), config, 42).unwrap();
//! assert_eq!(game.phase(), Phase::Previewing);
//!
//! // Preview runs out, cards go face-down.
//! game.advance(Duration::from_secs(3)).unwrap();
//! assert!(game.input_enabled());
//!
//! let response = game.handle_flip(SlotIndex(0)).unwrap();
//! assert_eq!(response, FlipResponse::Accepted { awaiting_second: true });
//! assert!(game.board().is_visible(SlotIndex(0)));
//! ```

use std::time::Duration;

use tracing::{debug, error, info, instrument, trace};

use crate::board::Board;
use crate::core::{GameRng, GameRngState, ImageId, MatchConfig, MatchError, SlotIndex};

use super::event::MatchEvent;
use super::phase::{Phase, Selection};
use super::timer::{TimerKind, TimerQueue};

/// Why a flip request was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// Preview, comparison, or restart in progress.
    InputLocked,
    /// The card is already face-up this turn.
    AlreadyVisible,
    /// The card belongs to a pair found this round.
    Matched,
}

/// Result of a flip request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlipResponse {
    /// The card was turned face-up.
    Accepted {
        /// True after the first flip of a turn, false after the second.
        awaiting_second: bool,
    },
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl FlipResponse {
    /// Whether the flip changed anything.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, FlipResponse::Accepted { .. })
    }
}

/// One game session over a board.
///
/// Owns the board and drives every visible transition on it. Time only
/// moves when the host calls [`advance`](Self::advance).
pub struct MatchGame<B: Board> {
    board: B,
    config: MatchConfig,
    rng: GameRng,
    phase: Phase,
    timers: TimerQueue,
    /// Image per slot for the current round.
    order: Vec<ImageId>,
    /// Slots that are part of a found pair.
    matched: Vec<bool>,
    found_pairs: usize,
    round: u32,
    rounds_won: u32,
    events: Vec<MatchEvent>,
    /// Set when a transition failed; the round cannot continue.
    fault: Option<MatchError>,
}

impl<B: Board> MatchGame<B> {
    /// Start a session: validate, deal the first round, begin the preview.
    ///
    /// Fails with a configuration error if the pool does not fill the board
    /// exactly; no image is assigned in that case.
    #[instrument(skip(board, config))]
    pub fn new(board: B, config: MatchConfig, seed: u64) -> Result<Self, MatchError> {
        Self::with_rng(board, config, GameRng::new(seed))
    }

    /// Start a session whose first deal continues from a captured RNG state.
    ///
    /// Pair with [`rng_state`](Self::rng_state) to replay any round's deal.
    #[instrument(skip(board, config))]
    pub fn from_rng_state(board: B, config: MatchConfig, state: &GameRngState) -> Result<Self, MatchError> {
        Self::with_rng(board, config, GameRng::from_state(state))
    }

    fn with_rng(board: B, config: MatchConfig, rng: GameRng) -> Result<Self, MatchError> {
        config.validate(board.slot_count())?;
        debug!(
            pairs = config.pair_target(),
            slots = board.slot_count(),
            seed = rng.seed(),
            "building game"
        );

        let slot_count = board.slot_count();
        let mut game = Self {
            board,
            config,
            rng,
            phase: Phase::Previewing,
            timers: TimerQueue::new(),
            order: Vec::with_capacity(slot_count),
            matched: vec![false; slot_count],
            found_pairs: 0,
            round: 0,
            rounds_won: 0,
            events: Vec::new(),
            fault: None,
        };
        game.start_round()?;
        Ok(game)
    }

    // === Accessors ===

    #[must_use]
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Mutable board access for the host's own bookkeeping.
    ///
    /// Changing images or visibility behind the game's back can
    /// desynchronize it; `resolve_turn` reports that as an error.
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a flip would currently be considered.
    #[must_use]
    pub fn input_enabled(&self) -> bool {
        self.phase.accepts_input()
    }

    /// Slots flipped this turn.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.phase.selection()
    }

    /// Pairs found this round.
    #[must_use]
    pub fn found_pairs(&self) -> usize {
        self.found_pairs
    }

    /// Pairs needed to win a round (the pool size).
    #[must_use]
    pub fn pair_target(&self) -> usize {
        self.config.pair_target()
    }

    /// Current round number, starting at 1.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Rounds won this session.
    #[must_use]
    pub fn rounds_won(&self) -> u32 {
        self.rounds_won
    }

    /// Timer generation; bumps whenever pending transitions are superseded.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.timers.generation()
    }

    /// Virtual clock reading.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// When the next pending transition falls due, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// RNG position; the next round's deal is drawn from here.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// The error that stopped the current round, if one did.
    #[must_use]
    pub fn fault(&self) -> Option<&MatchError> {
        self.fault.as_ref()
    }

    /// Images in slot order for the current round.
    #[must_use]
    pub fn order(&self) -> &[ImageId] {
        &self.order
    }

    /// Whether the slot belongs to a pair found this round.
    #[must_use]
    pub fn is_matched(&self, slot: SlotIndex) -> bool {
        self.matched.get(slot.index()).copied().unwrap_or(false)
    }

    /// Events queued since the last drain.
    #[must_use]
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// Take every queued event.
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    // === Round lifecycle ===

    /// Shuffle and deal a fresh round.
    ///
    /// Every image in the pool lands on exactly two slots. Pending timers
    /// from the previous round are invalidated and all flip handlers are
    /// disarmed; the board is left in whatever face state it had. Clears a
    /// recorded fault, since every slot gets a fresh image.
    #[instrument(skip(self))]
    pub fn new_round(&mut self) -> Result<(), MatchError> {
        let slot_count = self.board.slot_count();
        self.config.validate(slot_count)?;

        self.timers.invalidate();
        self.board.clear_flip_handlers();

        let mut order = Vec::with_capacity(slot_count);
        order.extend_from_slice(&self.config.pool);
        order.extend_from_slice(&self.config.pool);
        self.rng.shuffle(&mut order);

        for (slot, &image) in SlotIndex::all(slot_count).zip(&order) {
            self.board.assign_image(slot, image);
        }

        self.order = order;
        self.fault = None;
        self.matched = vec![false; slot_count];
        self.found_pairs = 0;
        self.phase = Phase::Previewing;
        self.round += 1;

        debug!(round = self.round, order = ?self.order, "dealt new round");
        self.events.push(MatchEvent::RoundStarted { round: self.round });
        Ok(())
    }

    /// Turn every card face-up and schedule the end of the preview.
    #[instrument(skip(self))]
    pub fn reveal_all(&mut self) {
        self.timers.invalidate();
        self.board.set_all_visible(true);
        self.phase = Phase::Previewing;
        self.timers.schedule(TimerKind::ConcealAll, self.config.preview_delay());
        debug!(delay_ms = self.config.preview_delay_ms, "revealed all cards");
    }

    /// Turn every unmatched card face-down, arm flips, open input.
    ///
    /// Found pairs stay face-up.
    #[instrument(skip(self))]
    pub fn conceal_all(&mut self) {
        for slot in SlotIndex::all(self.board.slot_count()) {
            if !self.is_matched(slot) {
                self.board.set_visible(slot, false);
            }
        }
        self.phase = Phase::Idle;
        self.arm_open_slots();
        debug!("concealed all cards, input enabled");
        self.events.push(MatchEvent::PreviewEnded);
    }

    /// Handle a user's request to flip a card.
    ///
    /// Ignored while input is locked and for cards already face-up, which
    /// also rules out picking the same card twice in one turn. The second
    /// accepted flip locks input and schedules the comparison.
    ///
    /// A flipped card is disarmed at once; the second flip disarms the
    /// whole board until the comparison is done.
    #[instrument(skip(self))]
    pub fn handle_flip(&mut self, slot: SlotIndex) -> Result<FlipResponse, MatchError> {
        self.check_fault()?;
        if slot.index() >= self.board.slot_count() {
            return Err(MatchError::UnknownSlot(slot));
        }

        if !self.phase.accepts_input() {
            trace!(phase = %self.phase, "flip ignored, input locked");
            return Ok(FlipResponse::Ignored(IgnoreReason::InputLocked));
        }
        if self.is_matched(slot) {
            trace!("flip ignored, already matched");
            return Ok(FlipResponse::Ignored(IgnoreReason::Matched));
        }
        if self.board.is_visible(slot) {
            trace!("flip ignored, already face-up");
            return Ok(FlipResponse::Ignored(IgnoreReason::AlreadyVisible));
        }

        self.board.set_visible(slot, true);
        self.board.disarm_flip(slot);
        self.events.push(MatchEvent::CardFlipped { slot });

        let awaiting_second = match self.phase {
            Phase::AwaitingSecondFlip { first } => {
                self.phase = Phase::Resolving { first, second: slot };
                self.board.clear_flip_handlers();
                self.timers.schedule(TimerKind::ResolveTurn, self.config.resolution_delay());
                debug!(%first, second = %slot, "second card flipped, input locked");
                false
            }
            _ => {
                self.phase = Phase::AwaitingSecondFlip { first: slot };
                debug!(%slot, "first card flipped");
                true
            }
        };

        Ok(FlipResponse::Accepted { awaiting_second })
    }

    /// Compare the two flipped cards.
    ///
    /// A match keeps both up and counts a pair; the last pair wins the
    /// round and restarts the session. A miss turns exactly those two
    /// cards back down. Either way the remaining face-down cards are
    /// re-armed. Does nothing outside `Resolving`.
    #[instrument(skip(self))]
    pub fn resolve_turn(&mut self) -> Result<(), MatchError> {
        let Phase::Resolving { first, second } = self.phase else {
            trace!(phase = %self.phase, "nothing to resolve");
            return Ok(());
        };

        let first_image = self.board.image_of(first).ok_or(MatchError::Desynchronized(first))?;
        let second_image = self.board.image_of(second).ok_or(MatchError::Desynchronized(second))?;

        self.phase = Phase::Idle;

        if first_image == second_image {
            self.matched[first.index()] = true;
            self.matched[second.index()] = true;
            self.found_pairs += 1;
            debug!(%first, %second, image = %first_image, found = self.found_pairs, "pair matched");
            self.events.push(MatchEvent::PairMatched { first, second });

            if self.found_pairs == self.pair_target() {
                self.rounds_won += 1;
                info!(round = self.round, rounds_won = self.rounds_won, "round won");
                self.events.push(MatchEvent::RoundWon);
                self.restart_session();
                return Ok(());
            }
        } else {
            self.board.set_visible(first, false);
            self.board.set_visible(second, false);
            debug!(%first, %second, "pair missed");
            self.events.push(MatchEvent::PairMissed { first, second });
        }

        self.arm_open_slots();
        Ok(())
    }

    /// Clear the board and schedule the next round.
    ///
    /// Supersedes any pending transition.
    #[instrument(skip(self))]
    pub fn restart_session(&mut self) {
        self.timers.invalidate();
        self.board.clear_flip_handlers();
        self.board.set_all_visible(false);
        self.phase = Phase::Won;
        self.timers.schedule(TimerKind::StartRound, self.config.restart_delay());
        debug!(delay_ms = self.config.restart_delay_ms, "starting new game");
        self.events.push(MatchEvent::SessionRestarted);
    }

    // === Time ===

    /// Move the clock forward by `elapsed`, firing every timer that falls
    /// due, including ones scheduled by earlier timers in the same window.
    ///
    /// An error from a transition is terminal for the round: the clock
    /// still moves to the end of the window, and every later `advance`,
    /// `fire_next` or `handle_flip` returns the same error until
    /// [`new_round`](Self::new_round) deals again.
    pub fn advance(&mut self, elapsed: Duration) -> Result<(), MatchError> {
        self.check_fault()?;
        let until = self.timers.now() + elapsed;
        while let Some(timer) = self.timers.pop_due(until) {
            if let Err(err) = self.fire(timer.kind) {
                self.timers.settle(until);
                return Err(err);
            }
        }
        self.timers.settle(until);
        Ok(())
    }

    /// Jump straight to the next pending transition and fire it.
    ///
    /// Returns which transition ran, or `None` if nothing was pending.
    pub fn fire_next(&mut self) -> Result<Option<TimerKind>, MatchError> {
        self.check_fault()?;
        let Some(due) = self.timers.next_deadline() else {
            return Ok(None);
        };
        match self.timers.pop_due(due) {
            Some(timer) => {
                self.fire(timer.kind)?;
                Ok(Some(timer.kind))
            }
            None => Ok(None),
        }
    }

    fn fire(&mut self, kind: TimerKind) -> Result<(), MatchError> {
        trace!(?kind, now = ?self.timers.now(), "timer fired");
        let result = match kind {
            TimerKind::ConcealAll => {
                self.conceal_all();
                Ok(())
            }
            TimerKind::ResolveTurn => self.resolve_turn(),
            TimerKind::StartRound => self.start_round(),
        };
        if let Err(err) = &result {
            error!(%err, phase = %self.phase, "transition failed, round halted");
            self.fault = Some(err.clone());
        }
        result
    }

    fn check_fault(&self) -> Result<(), MatchError> {
        match &self.fault {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Arm every face-down card that isn't part of a found pair.
    fn arm_open_slots(&mut self) {
        for slot in SlotIndex::all(self.board.slot_count()) {
            if !self.is_matched(slot) && !self.board.is_visible(slot) {
                self.board.arm_flip(slot);
            }
        }
    }

    fn start_round(&mut self) -> Result<(), MatchError> {
        self.new_round()?;
        self.reveal_all();
        Ok(())
    }
}

impl<B: Board + std::fmt::Debug> std::fmt::Debug for MatchGame<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchGame")
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("found_pairs", &self.found_pairs)
            .field("pair_target", &self.pair_target())
            .field("now", &self.timers.now())
            .field("board", &self.board)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MemoryBoard;

    fn two_pair_game() -> MatchGame<MemoryBoard> {
        let config = MatchConfig::new([ImageId(1), ImageId(2)]);
        let mut game = MatchGame::new(MemoryBoard::new(4), config, 7).unwrap();
        game.advance(Duration::from_millis(3000)).unwrap();
        game
    }

    #[test]
    fn test_new_starts_previewing() {
        let config = MatchConfig::new([ImageId(1), ImageId(2)]);
        let game = MatchGame::new(MemoryBoard::new(4), config, 7).unwrap();

        assert_eq!(game.phase(), Phase::Previewing);
        assert!(!game.input_enabled());
        assert_eq!(game.round(), 1);
        assert_eq!(game.board().visible_count(), 4);
        assert_eq!(game.next_deadline(), Some(Duration::from_millis(3000)));
        assert_eq!(game.events(), &[MatchEvent::RoundStarted { round: 1 }]);
    }

    #[test]
    fn test_new_rejects_mismatched_board() {
        let config = MatchConfig::new([ImageId(1), ImageId(2)]);
        let err = MatchGame::new(MemoryBoard::new(6), config, 7).unwrap_err();
        assert_eq!(
            err,
            MatchError::Configuration {
                pool_len: 2,
                slot_count: 6
            }
        );
    }

    #[test]
    fn test_preview_not_over_early() {
        let config = MatchConfig::new([ImageId(1), ImageId(2)]);
        let mut game = MatchGame::new(MemoryBoard::new(4), config, 7).unwrap();
        game.advance(Duration::from_millis(2999)).unwrap();
        assert_eq!(game.phase(), Phase::Previewing);
        game.advance(Duration::from_millis(1)).unwrap();
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn test_unknown_slot() {
        let mut game = two_pair_game();
        assert_eq!(
            game.handle_flip(SlotIndex(4)),
            Err(MatchError::UnknownSlot(SlotIndex(4)))
        );
    }

    #[test]
    fn test_second_flip_locks_and_schedules() {
        let mut game = two_pair_game();
        game.handle_flip(SlotIndex(0)).unwrap();
        let response = game.handle_flip(SlotIndex(1)).unwrap();

        assert_eq!(response, FlipResponse::Accepted { awaiting_second: false });
        assert!(!game.input_enabled());
        assert_eq!(game.next_deadline(), Some(Duration::from_millis(5000)));
        assert_eq!(
            game.handle_flip(SlotIndex(2)).unwrap(),
            FlipResponse::Ignored(IgnoreReason::InputLocked)
        );
        assert!(!game.board().is_visible(SlotIndex(2)));
    }

    #[test]
    fn test_resolve_outside_resolving_is_noop() {
        let mut game = two_pair_game();
        game.resolve_turn().unwrap();
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.found_pairs(), 0);
    }

    #[test]
    fn test_desynchronized_board() {
        let mut game = two_pair_game();
        game.handle_flip(SlotIndex(0)).unwrap();
        game.handle_flip(SlotIndex(1)).unwrap();
        game.board_mut().clear_image(SlotIndex(1));

        assert_eq!(
            game.advance(Duration::from_millis(2000)),
            Err(MatchError::Desynchronized(SlotIndex(1)))
        );
    }

    #[test]
    fn test_fault_is_sticky_until_new_round() {
        let mut game = two_pair_game();
        game.handle_flip(SlotIndex(0)).unwrap();
        game.handle_flip(SlotIndex(1)).unwrap();
        game.board_mut().clear_image(SlotIndex(1));

        let err = MatchError::Desynchronized(SlotIndex(1));
        assert_eq!(game.advance(Duration::from_millis(2500)), Err(err.clone()));
        // Clock still reaches the end of the window.
        assert_eq!(game.now(), Duration::from_millis(5500));
        assert_eq!(game.fault(), Some(&err));

        assert_eq!(game.advance(Duration::from_millis(100)), Err(err.clone()));
        assert_eq!(game.fire_next(), Err(err.clone()));
        assert_eq!(game.handle_flip(SlotIndex(2)), Err(err));

        game.new_round().unwrap();
        game.reveal_all();
        assert_eq!(game.fault(), None);
        game.advance(Duration::from_millis(3000)).unwrap();
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn test_fire_next() {
        let config = MatchConfig::new([ImageId(1), ImageId(2)]);
        let mut game = MatchGame::new(MemoryBoard::new(4), config, 7).unwrap();

        assert_eq!(game.fire_next().unwrap(), Some(TimerKind::ConcealAll));
        assert_eq!(game.now(), Duration::from_millis(3000));
        assert_eq!(game.fire_next().unwrap(), None);
    }
}
