//! # Score Tracker
//!
//! Two goal counters and the confirmation gate in front of them.
//!
//! A goal during a break or a timeout is usually a mistake at the score
//! table, so it is only recorded after an explicit yes from the operator.
//! A no is a normal outcome, never an error.

use crate::Side;
use crate::system::{Stage, StageKind};
use serde::{Deserialize, Serialize};

// =============================================================================
// CONFIRMATION
// =============================================================================

/// Source of yes/no answers for goals that need confirmation.
pub trait Confirm {
    /// Ask whether a goal during `stage` should be recorded anyway.
    fn confirm(&mut self, stage: Stage, kind: StageKind) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(Stage, StageKind) -> bool,
{
    fn confirm(&mut self, stage: Stage, kind: StageKind) -> bool {
        self(stage, kind)
    }
}

/// Answer every confirmation with the same decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Always(pub bool);

impl Confirm for Always {
    fn confirm(&mut self, _stage: Stage, _kind: StageKind) -> bool {
        self.0
    }
}

// =============================================================================
// SCORE OUTCOME
// =============================================================================

/// What happened to a score-add request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreOutcome {
    /// The goal was recorded.
    Added {
        side: Side,
        white: u32,
        black: u32,
    },
    /// The operator declined the confirmation; nothing changed.
    Declined,
    /// The game is over; nothing changed.
    Rejected,
}

impl ScoreOutcome {
    /// True if a counter changed.
    #[must_use]
    pub fn is_added(&self) -> bool {
        matches!(self, ScoreOutcome::Added { .. })
    }
}

// =============================================================================
// SCORE TRACKER
// =============================================================================

/// White and black goal counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    white: u32,
    black: u32,
}

impl ScoreTracker {
    /// Create a tracker at 0-0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one goal to `side` if `stage` allows it.
    ///
    /// `kind` is the kind currently in force (a timeout overrides the
    /// stage's own kind). Break and Timeout consult `confirm` first.
    pub fn add(
        &mut self,
        side: Side,
        stage: Stage,
        kind: Option<StageKind>,
        confirm: &mut dyn Confirm,
    ) -> ScoreOutcome {
        let Some(kind) = kind else {
            return ScoreOutcome::Rejected;
        };

        if kind.needs_confirmation() && !confirm.confirm(stage, kind) {
            return ScoreOutcome::Declined;
        }

        match side {
            Side::White => self.white = self.white.saturating_add(1),
            Side::Black => self.black = self.black.saturating_add(1),
        }

        ScoreOutcome::Added {
            side,
            white: self.white,
            black: self.black,
        }
    }

    #[must_use]
    pub fn white(&self) -> u32 {
        self.white
    }

    #[must_use]
    pub fn black(&self) -> u32 {
        self.black
    }

    #[must_use]
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    #[must_use]
    pub fn is_tied(&self) -> bool {
        self.white == self.black
    }
}

// =============================================================================
// TESTS
// =============================================================================
