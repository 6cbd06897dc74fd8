//! # Stage Machine
//!
//! The ordered periods of a match and the rules that move between them.
//!
//! ## Transition Table
//!
//! Rules are evaluated in this order; only the first matching rule fires,
//! and at most one rule fires per evaluation.
//!
//! | Current | Fires when | Next | Offset | New target |
//! |---------|------------|------|--------|------------|
//! | FirstHalf | elapsed ≥ half | HalfTime | half | half_time |
//! | HalfTime | elapsed ≥ half_time | SecondHalf | half_time | half |
//! | SecondHalf | elapsed ≥ half, scores differ or no overtime | GameOver | - | - |
//! | SecondHalf | elapsed ≥ half, tied, golden goal | GoldenGoal | half | 0 |
//! | SecondHalf | elapsed ≥ half, tied, extra time | ExtraTimeBreak | half | extra_break |
//! | ExtraTimeBreak | elapsed ≥ extra_break | ExtraTime1 | extra_break | extra_half |
//! | ExtraTime1 | elapsed ≥ extra_half | ExtraHalfTime | extra_half | extra_break |
//! | ExtraHalfTime | elapsed ≥ extra_break | ExtraTime2 | extra_break | extra_half |
//! | ExtraTime2 | elapsed ≥ extra_half, scores differ | GameOver | - | - |
//! | ExtraTime2 | elapsed ≥ extra_half, tied | GoldenGoal | extra_half | 0 |
//! | GoldenGoal | a goal is scored (event, not clock) | GameOver | - | - |
//!
//! All durations here are seconds.

use crate::config::{GameConfig, OvertimeMode};
use crate::primitives::COUNT_UP_TARGET;
use crate::UwhError;
use serde::{Deserialize, Serialize};

// =============================================================================
// STAGE ENUM
// =============================================================================

/// One named period of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    FirstHalf,
    HalfTime,
    SecondHalf,
    ExtraTimeBreak,
    ExtraTime1,
    ExtraHalfTime,
    ExtraTime2,
    GoldenGoal,
    GameOver,
}

impl Stage {
    /// Every stage in table order.
    pub const ALL: [Stage; 9] = [
        Stage::FirstHalf,
        Stage::HalfTime,
        Stage::SecondHalf,
        Stage::ExtraTimeBreak,
        Stage::ExtraTime1,
        Stage::ExtraHalfTime,
        Stage::ExtraTime2,
        Stage::GoldenGoal,
        Stage::GameOver,
    ];

    /// Get the label shown to players and officials.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Stage::FirstHalf => "First Half",
            Stage::HalfTime => "Half-Time",
            Stage::SecondHalf => "Second Half",
            Stage::ExtraTimeBreak => "Extra Time Break",
            Stage::ExtraTime1 => "Extra Time 1st Half",
            Stage::ExtraHalfTime => "Extra Half-Time",
            Stage::ExtraTime2 => "Extra Time 2nd Half",
            Stage::GoldenGoal => "Golden Goal",
            Stage::GameOver => "Game Over",
        }
    }

    /// Get the kind of a non-terminal stage.
    ///
    /// `Timeout` is never returned here: timeouts are called by an operator
    /// on top of a stage, see `GameEngine::call_timeout`.
    #[must_use]
    pub fn kind(&self) -> Option<StageKind> {
        match self {
            Stage::FirstHalf
            | Stage::SecondHalf
            | Stage::ExtraTime1
            | Stage::ExtraTime2
            | Stage::GoldenGoal => Some(StageKind::Play),
            Stage::HalfTime | Stage::ExtraTimeBreak | Stage::ExtraHalfTime => {
                Some(StageKind::Break)
            }
            Stage::GameOver => None,
        }
    }

    /// Check if this stage is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::GameOver)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What a stage means for the people in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKind {
    /// The puck is live.
    Play,
    /// Half-time or an overtime break.
    Break,
    /// An operator-called stoppage.
    Timeout,
}

impl StageKind {
    /// Get the kind name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Play => "Play",
            StageKind::Break => "Break",
            StageKind::Timeout => "Timeout",
        }
    }

    /// Goals recorded while the puck is not live must be confirmed.
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, StageKind::Break | StageKind::Timeout)
    }
}

// =============================================================================
// DURATIONS
// =============================================================================

/// Stage durations in seconds, derived once from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDurations {
    pub half: u32,
    pub half_time: u32,
    pub overtime: OvertimeMode,
    /// Extra half length, present only with extra time.
    pub extra_half: Option<u32>,
    /// Extra break length, present only with extra time.
    pub extra_break: Option<u32>,
}

impl StageDurations {
    /// Convert configured units into seconds.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        let unit = config.unit().seconds();
        let extra = config.extra_time();
        Self {
            half: config.half_duration().saturating_mul(unit),
            half_time: config.half_time_duration().saturating_mul(unit),
            overtime: config.overtime(),
            extra_half: extra.map(|e| e.half_duration.saturating_mul(unit)),
            extra_break: extra.map(|e| e.break_duration.saturating_mul(unit)),
        }
    }
}

// =============================================================================
// TRANSITIONS
// =============================================================================

/// One fired rule of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
    /// Seconds to add to the clock offset; `None` when entering GameOver.
    pub offset_delta: Option<u32>,
    /// Target of the new stage; `None` when entering GameOver.
    pub target: Option<i64>,
}

impl Transition {
    fn timed(from: Stage, to: Stage, offset_delta: u32, target: i64) -> Self {
        Self {
            from,
            to,
            offset_delta: Some(offset_delta),
            target: Some(target),
        }
    }

    fn game_over(from: Stage) -> Self {
        Self {
            from,
            to: Stage::GameOver,
            offset_delta: None,
            target: None,
        }
    }

    /// True when this transition ends the match.
    #[must_use]
    pub fn ends_game(&self) -> bool {
        self.to.is_terminal()
    }
}

// =============================================================================
// STAGE MACHINE
// =============================================================================

/// Current stage plus the rule table.
#[derive(Debug, Clone)]
pub struct StageMachine {
    stage: Stage,
    durations: StageDurations,
}

impl StageMachine {
    /// Create a machine in FirstHalf.
    #[must_use]
    pub fn new(durations: StageDurations) -> Self {
        Self {
            stage: Stage::FirstHalf,
            durations,
        }
    }

    /// Target of the first stage.
    #[must_use]
    pub fn initial_target(&self) -> i64 {
        i64::from(self.durations.half)
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Evaluate the table without changing state.
    ///
    /// `tied` is whether both scores are equal right now.
    pub fn evaluate(&self, elapsed: i64, tied: bool) -> Result<Option<Transition>, UwhError> {
        let d = &self.durations;
        let reached = |duration: u32| elapsed >= i64::from(duration);

        let transition = match self.stage {
            Stage::FirstHalf if reached(d.half) => Some(Transition::timed(
                Stage::FirstHalf,
                Stage::HalfTime,
                d.half,
                i64::from(d.half_time),
            )),
            Stage::HalfTime if reached(d.half_time) => Some(Transition::timed(
                Stage::HalfTime,
                Stage::SecondHalf,
                d.half_time,
                i64::from(d.half),
            )),
            Stage::SecondHalf if reached(d.half) => {
                if !tied || d.overtime == OvertimeMode::None {
                    Some(Transition::game_over(Stage::SecondHalf))
                } else if d.overtime == OvertimeMode::GoldenGoal {
                    Some(Transition::timed(
                        Stage::SecondHalf,
                        Stage::GoldenGoal,
                        d.half,
                        COUNT_UP_TARGET,
                    ))
                } else {
                    let extra_break = self.extra_break()?;
                    Some(Transition::timed(
                        Stage::SecondHalf,
                        Stage::ExtraTimeBreak,
                        d.half,
                        i64::from(extra_break),
                    ))
                }
            }
            Stage::ExtraTimeBreak => {
                let extra_break = self.extra_break()?;
                let extra_half = self.extra_half()?;
                reached(extra_break).then(|| {
                    Transition::timed(
                        Stage::ExtraTimeBreak,
                        Stage::ExtraTime1,
                        extra_break,
                        i64::from(extra_half),
                    )
                })
            }
            Stage::ExtraTime1 => {
                let extra_break = self.extra_break()?;
                let extra_half = self.extra_half()?;
                reached(extra_half).then(|| {
                    Transition::timed(
                        Stage::ExtraTime1,
                        Stage::ExtraHalfTime,
                        extra_half,
                        i64::from(extra_break),
                    )
                })
            }
            Stage::ExtraHalfTime => {
                let extra_break = self.extra_break()?;
                let extra_half = self.extra_half()?;
                reached(extra_break).then(|| {
                    Transition::timed(
                        Stage::ExtraHalfTime,
                        Stage::ExtraTime2,
                        extra_break,
                        i64::from(extra_half),
                    )
                })
            }
            Stage::ExtraTime2 => {
                let extra_half = self.extra_half()?;
                match (reached(extra_half), tied) {
                    (false, _) => None,
                    (true, false) => Some(Transition::game_over(Stage::ExtraTime2)),
                    (true, true) => Some(Transition::timed(
                        Stage::ExtraTime2,
                        Stage::GoldenGoal,
                        extra_half,
                        COUNT_UP_TARGET,
                    )),
                }
            }
            // Clock never ends these: golden goal exits on a score, game over is terminal.
            Stage::GoldenGoal | Stage::GameOver => None,
            Stage::FirstHalf | Stage::HalfTime | Stage::SecondHalf => None,
        };

        Ok(transition)
    }

    /// Evaluate and apply at most one transition.
    pub fn step(&mut self, elapsed: i64, tied: bool) -> Result<Option<Transition>, UwhError> {
        let transition = self.evaluate(elapsed, tied)?;
        if let Some(t) = transition {
            self.stage = t.to;
        }
        Ok(transition)
    }

    /// Event-triggered exit from golden goal. No-op in any other stage.
    pub fn force_game_over(&mut self) -> Option<Transition> {
        if self.stage != Stage::GoldenGoal {
            return None;
        }
        let transition = Transition::game_over(Stage::GoldenGoal);
        self.stage = Stage::GameOver;
        Some(transition)
    }

    fn extra_half(&self) -> Result<u32, UwhError> {
        self.durations
            .extra_half
            .ok_or_else(|| self.invariant("extra half length is not configured"))
    }

    fn extra_break(&self) -> Result<u32, UwhError> {
        self.durations
            .extra_break
            .ok_or_else(|| self.invariant("extra break length is not configured"))
    }

    fn invariant(&self, reason: &str) -> UwhError {
        UwhError::StageInvariant {
            stage: self.stage,
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
