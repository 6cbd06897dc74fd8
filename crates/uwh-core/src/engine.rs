//! # Game Engine
//!
//! Owns the clock, the stage machine, the score tracker and the result
//! sink of one match.
//!
//! ## Control Flow
//!
//! - `tick(now)` evaluates elapsed time and applies zero or one transition.
//! - `catch_up(now)` ticks until nothing fires, so an overdue tick still
//!   walks through every stage in order.
//! - `add_score` applies one goal, asking for confirmation when the puck is
//!   not live. In golden goal a recorded goal ends the match.
//! - Entering GameOver writes the result exactly once.
//!
//! The engine never reads the system clock: every call takes `now`.

use crate::clock::Clock;
use crate::config::GameConfig;
use crate::formats::ResultRecord;
use crate::primitives::WALL_CLOCK_FORMAT;
use crate::score::{Confirm, ScoreOutcome, ScoreTracker};
use crate::storage::{ResultSink, SaveOutcome};
use crate::system::{Stage, StageDurations, StageKind, StageMachine, Transition};
use crate::{Side, UwhError};
use chrono::NaiveTime;
use std::time::Instant;

// =============================================================================
// TICK OUTCOME
// =============================================================================

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No rule matched, or the game is already over.
    Idle,
    /// A timeout is active; nothing was evaluated.
    Paused,
    /// Moved to the next stage.
    Transitioned { from: Stage, to: Stage },
    /// Entered GameOver and wrote the result.
    Finished(SaveOutcome),
}

// =============================================================================
// GAME ENGINE
// =============================================================================

/// One match from first half to game over.
#[derive(Debug)]
pub struct GameEngine<S: ResultSink> {
    config: GameConfig,
    clock: Clock,
    machine: StageMachine,
    scores: ScoreTracker,
    sink: S,
    started_at: NaiveTime,
    /// Instant the current timeout was called.
    paused_at: Option<Instant>,
    /// Set before the single save is attempted.
    saved: bool,
    save_outcome: Option<SaveOutcome>,
}

impl<S: ResultSink> GameEngine<S> {
    /// Start a match at `start`.
    ///
    /// `started_at` is the wall-clock time stored with the result.
    pub fn new(config: GameConfig, sink: S, start: Instant, started_at: NaiveTime) -> Self {
        let machine = StageMachine::new(StageDurations::from_config(&config));
        let clock = Clock::start(start, machine.initial_target());

        tracing::info!(
            game = %config.game_id(),
            white = config.white_team(),
            black = config.black_team(),
            overtime = config.overtime().name(),
            length = %config.length(),
            "Game started"
        );

        Self {
            config,
            clock,
            machine,
            scores: ScoreTracker::new(),
            sink,
            started_at,
            paused_at: None,
            saved: false,
            save_outcome: None,
        }
    }

    // -------------------------------------------------------------------------
    // Ticks
    // -------------------------------------------------------------------------

    /// Evaluate the transition table once.
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome, UwhError> {
        if self.is_over() {
            return Ok(TickOutcome::Idle);
        }
        if self.paused_at.is_some() {
            return Ok(TickOutcome::Paused);
        }

        let elapsed = self.clock.elapsed(now);
        let Some(transition) = self.machine.step(elapsed, self.scores.is_tied())? else {
            return Ok(TickOutcome::Idle);
        };

        self.apply(transition);
        if transition.ends_game() {
            return self.finish().map(TickOutcome::Finished);
        }

        Ok(TickOutcome::Transitioned {
            from: transition.from,
            to: transition.to,
        })
    }

    /// Tick until no rule matches. Returns every non-idle outcome in order.
    pub fn catch_up(&mut self, now: Instant) -> Result<Vec<TickOutcome>, UwhError> {
        let mut outcomes = Vec::new();
        loop {
            match self.tick(now)? {
                TickOutcome::Idle | TickOutcome::Paused => break,
                finished @ TickOutcome::Finished(_) => {
                    outcomes.push(finished);
                    break;
                }
                moved @ TickOutcome::Transitioned { .. } => outcomes.push(moved),
            }
        }
        Ok(outcomes)
    }

    fn apply(&mut self, transition: Transition) {
        if let Some(delta) = transition.offset_delta {
            self.clock.advance_offset(delta);
        }
        if let Some(target) = transition.target {
            self.clock.set_target(target);
        }

        tracing::info!(
            game = %self.config.game_id(),
            from = %transition.from,
            to = %transition.to,
            white = self.scores.white(),
            black = self.scores.black(),
            "Stage transition"
        );
    }

    /// Write the result. Runs at most once per match.
    fn finish(&mut self) -> Result<SaveOutcome, UwhError> {
        if let Some(outcome) = &self.save_outcome {
            return Ok(outcome.clone());
        }
        if self.saved {
            return Err(UwhError::Io(format!(
                "Result for game no. {} was already attempted",
                self.config.game_id()
            )));
        }
        self.saved = true;

        let outcome = self.sink.save(self.config.game_id(), &self.record())?;
        if let Some(message) = outcome.conflict_message() {
            tracing::warn!(game = %self.config.game_id(), "{}", message);
        }
        self.save_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// The record written at game over.
    #[must_use]
    pub fn record(&self) -> ResultRecord {
        ResultRecord {
            white_team: self.config.white_team().to_string(),
            black_team: self.config.black_team().to_string(),
            white_score: self.scores.white(),
            black_score: self.scores.black(),
            start_time: self.started_at.format(WALL_CLOCK_FORMAT).to_string(),
        }
    }

    // -------------------------------------------------------------------------
    // Scoring
    // -------------------------------------------------------------------------

    /// Add one goal to `side`.
    ///
    /// In golden goal a recorded goal ends the match and writes the result;
    /// check `is_over` and `save_outcome` afterwards.
    pub fn add_score(
        &mut self,
        side: Side,
        confirm: &mut dyn Confirm,
    ) -> Result<ScoreOutcome, UwhError> {
        let stage = self.stage();
        let outcome = self.scores.add(side, stage, self.kind(), confirm);

        if let ScoreOutcome::Added { white, black, .. } = outcome {
            tracing::info!(
                game = %self.config.game_id(),
                side = %side,
                stage = %stage,
                white,
                black,
                "Goal"
            );

            if let Some(transition) = self.machine.force_game_over() {
                self.paused_at = None;
                self.apply(transition);
                self.finish()?;
            }
        }

        Ok(outcome)
    }

    /// True when a goal right now would need the operator's confirmation.
    #[must_use]
    pub fn requires_confirmation(&self) -> bool {
        self.kind().is_some_and(|kind| kind.needs_confirmation())
    }

    // -------------------------------------------------------------------------
    // Timeouts
    // -------------------------------------------------------------------------

    /// Freeze the clock until `resume`.
    pub fn call_timeout(&mut self, now: Instant) -> Result<(), UwhError> {
        if self.is_over() {
            return Err(UwhError::Timeout("the game is over".to_string()));
        }
        if self.paused_at.is_some() {
            return Err(UwhError::Timeout("a timeout is already running".to_string()));
        }

        self.paused_at = Some(now);
        tracing::info!(
            game = %self.config.game_id(),
            stage = %self.stage(),
            elapsed = self.clock.elapsed(now),
            "Timeout called"
        );
        Ok(())
    }

    /// Restart the clock. Returns the whole seconds excluded from the stage.
    pub fn resume(&mut self, now: Instant) -> Result<i64, UwhError> {
        let Some(paused_at) = self.paused_at.take() else {
            return Err(UwhError::Timeout("no timeout is running".to_string()));
        };

        let paused = self
            .clock
            .total_seconds(now)
            .saturating_sub(self.clock.total_seconds(paused_at))
            .max(0);
        self.clock.pause_offset(paused);

        tracing::info!(
            game = %self.config.game_id(),
            stage = %self.stage(),
            paused,
            "Play resumed"
        );
        Ok(paused)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    /// Seconds spent in the current stage; frozen during a timeout.
    #[must_use]
    pub fn stage_elapsed(&self, now: Instant) -> i64 {
        self.clock.elapsed(self.paused_at.unwrap_or(now))
    }

    /// Seconds left in the current stage; frozen during a timeout.
    #[must_use]
    pub fn stage_remaining(&self, now: Instant) -> i64 {
        self.clock.remaining(self.paused_at.unwrap_or(now))
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.machine.stage()
    }

    /// Kind in force: Timeout while paused, the stage's own kind otherwise.
    #[must_use]
    pub fn kind(&self) -> Option<StageKind> {
        let kind = self.stage().kind()?;
        if self.paused_at.is_some() {
            return Some(StageKind::Timeout);
        }
        Some(kind)
    }

    #[must_use]
    pub fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.stage().is_terminal()
    }

    /// Outcome of the single save, once the game is over.
    #[must_use]
    pub fn save_outcome(&self) -> Option<&SaveOutcome> {
        self.save_outcome.as_ref()
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

// =============================================================================
// TESTS
// =============================================================================
