//! # Terminal I/O
//!
//! Operator commands typed on stdin and the one-line scoreboard on stdout.

use tokio::sync::mpsc;
use uwh_core::{DisplayState, Side};

/// Read stdin on a dedicated thread, one message per line.
///
/// A blocking read never holds up runtime shutdown this way. The channel
/// closes at end of input.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("Cannot read operator input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// One line typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Goal for a side (`w` or `b`).
    Goal(Side),
    /// Call a timeout, or resume if one is running (`t`).
    Timeout,
    /// Leave without saving (`q`).
    Quit,
    /// Show the command list (`h` or `?`).
    Help,
    /// Empty line.
    Nothing,
    /// Anything else.
    Unknown,
}

impl Command {
    /// Parse a typed line. Case and surrounding blanks are ignored.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "" => Command::Nothing,
            "w" | "white" => Command::Goal(Side::White),
            "b" | "black" => Command::Goal(Side::Black),
            "t" | "timeout" => Command::Timeout,
            "q" | "quit" => Command::Quit,
            "h" | "?" | "help" => Command::Help,
            _ => Command::Unknown,
        }
    }
}

pub const HELP: &str = "Commands: w = goal white, b = goal black, t = timeout/resume, q = quit";

/// True for "y" or "yes".
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// The scoreboard as one line.
#[must_use]
pub fn render_line(state: &DisplayState) -> String {
    let mut line = format!(
        "[{}] {}  {} {} - {} {}  | {} | {}",
        state.stage_label,
        state.clock,
        state.white_team,
        state.white_score,
        state.black_score,
        state.black_team,
        state.game_label,
        state.wall_clock,
    );
    if let Some(notice) = &state.notice {
        line.push_str("  ! ");
        line.push_str(notice);
    }
    line
}
