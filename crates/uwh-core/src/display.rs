//! # Display Snapshot
//!
//! A read-only view of the engine for whatever renders the scoreboard.

use crate::engine::GameEngine;
use crate::primitives::WALL_CLOCK_FORMAT;
use crate::storage::ResultSink;
use crate::system::Stage;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything a scoreboard shows at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Stage label, or "Timeout" while one is running.
    pub stage_label: String,
    /// "Play", "Break", "Timeout"; `None` after the game.
    pub kind: Option<String>,
    /// Stage clock, `MM:SS`.
    pub clock: String,
    pub white_team: String,
    pub black_team: String,
    pub white_score: u32,
    pub black_score: u32,
    /// Time of day, `HH:MM:SS`.
    pub wall_clock: String,
    /// "Game no. N".
    pub game_label: String,
    pub game_over: bool,
    /// Operator-facing message about the saved result, if any.
    pub notice: Option<String>,
}

impl DisplayState {
    /// Take a snapshot of `engine` at `now`.
    #[must_use]
    pub fn capture<S: ResultSink>(engine: &GameEngine<S>, now: Instant, wall_now: NaiveTime) -> Self {
        let stage = engine.stage();
        let kind = engine.kind();
        let config = engine.config();

        let seconds = match stage {
            Stage::GameOver => 0,
            _ if engine.clock().is_counting_up() => engine.stage_elapsed(now),
            _ => engine.stage_remaining(now).max(0),
        };

        let stage_label = if engine.is_paused() {
            "Timeout".to_string()
        } else {
            stage.label().to_string()
        };

        let notice = engine.save_outcome().and_then(|outcome| {
            outcome.conflict_message().or_else(|| {
                outcome.recovered.as_ref().map(|recovery| match &recovery.backup {
                    Some(path) => format!(
                        "Result file was unreadable; old contents kept in {}",
                        path.display()
                    ),
                    None => "Result file was empty or unreadable and has been reset".to_string(),
                })
            })
        });

        Self {
            stage_label,
            kind: kind.map(|k| k.name().to_string()),
            clock: format_clock(seconds),
            white_team: config.white_team().to_string(),
            black_team: config.black_team().to_string(),
            white_score: engine.scores().white(),
            black_score: engine.scores().black(),
            wall_clock: wall_now.format(WALL_CLOCK_FORMAT).to_string(),
            game_label: config.game_id().label(),
            game_over: engine.is_over(),
            notice,
        }
    }
}

/// Format seconds as `MM:SS`. Negative input shows as `00:00`.
///
/// Minutes are not capped, so a long golden goal reads `104:05`.
#[must_use]
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
