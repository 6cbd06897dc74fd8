//! # Stage Clock
//!
//! Converts "now" into the number of whole seconds spent in the current
//! stage.
//!
//! The clock never counts ticks. Every query recomputes the difference
//! between `now` and the fixed start instant, truncates it to whole seconds
//! and subtracts the time already consumed by finished stages. A tick that
//! fires late is corrected on the next one instead of drifting.
//!
//! `now` is always passed in by the caller, which keeps the clock pure and
//! lets tests drive it with synthetic instants.

use crate::primitives::COUNT_UP_TARGET;
use std::time::Instant;

/// Elapsed/remaining time of the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    /// Set once when the game starts.
    start: Instant,
    /// Seconds consumed by completed stages and timeouts. Never decreases.
    elapsed_offset: i64,
    /// Seconds to reach before the next transition; 0 counts up.
    target: i64,
}

impl Clock {
    /// Start a clock at `start` with the first stage's target.
    #[must_use]
    pub fn start(start: Instant, target: i64) -> Self {
        Self {
            start,
            elapsed_offset: 0,
            target: target.max(0),
        }
    }

    /// Whole seconds since the start instant, sub-second part truncated.
    ///
    /// Saturates at 0 if `now` precedes the start.
    #[must_use]
    pub fn total_seconds(&self, now: Instant) -> i64 {
        let secs = now.saturating_duration_since(self.start).as_secs();
        i64::try_from(secs).unwrap_or(i64::MAX)
    }

    /// Whole seconds spent in the current stage.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> i64 {
        self.total_seconds(now)
            .saturating_sub(self.elapsed_offset)
            .max(0)
    }

    /// Seconds left before the target. Non-positive means due.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> i64 {
        self.target.saturating_sub(self.elapsed(now))
    }

    /// Mark a stage of `delta` seconds as consumed.
    pub fn advance_offset(&mut self, delta: u32) {
        self.elapsed_offset = self.elapsed_offset.saturating_add(i64::from(delta));
    }

    /// Exclude `delta` paused seconds from the current stage.
    pub fn pause_offset(&mut self, delta: i64) {
        self.elapsed_offset = self.elapsed_offset.saturating_add(delta.max(0));
    }

    /// Set the target of the stage just entered.
    pub fn set_target(&mut self, target: i64) {
        self.target = target.max(0);
    }

    #[must_use]
    pub fn target(&self) -> i64 {
        self.target
    }

    #[must_use]
    pub fn elapsed_offset(&self) -> i64 {
        self.elapsed_offset
    }

    /// True when the stage has no target and the clock counts upward.
    #[must_use]
    pub fn is_counting_up(&self) -> bool {
        self.target == COUNT_UP_TARGET
    }
}
