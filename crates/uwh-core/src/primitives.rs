//! # Game Primitives
//!
//! Hardcoded constants shared by the engine, the result store and the app.
//!
//! These values are compiled into the binary and are immutable at runtime.

/// Interval between two scheduled ticks, in milliseconds.
///
/// The engine never counts ticks; this only sets how often elapsed time is
/// re-evaluated against the absolute start instant.
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Seconds in one configured minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Target value meaning "count up, no target" (golden goal only).
pub const COUNT_UP_TARGET: i64 = 0;

/// Reserved key in the result document holding colliding records.
pub const SAVE_ERROR_KEY: &str = "save_error";

/// Default path of the result document.
pub const DEFAULT_RESULTS_PATH: &str = "results.json";

/// Label used when the white team name is left blank.
pub const DEFAULT_WHITE_TEAM: &str = "WHITE TEAM";

/// Label used when the black team name is left blank.
pub const DEFAULT_BLACK_TEAM: &str = "BLACK TEAM";

/// Game number used when none is given.
pub const DEFAULT_GAME_ID: u32 = 1;

/// Smallest accepted duration for any configured period.
pub const MIN_PERIOD_LENGTH: u32 = 1;

/// Wall-clock format used for result start times and the display clock.
pub const WALL_CLOCK_FORMAT: &str = "%H:%M:%S";

/// Maximum size of a result document we are willing to read (16 MB).
///
/// A match produces one small record; anything larger is not ours.
pub const MAX_RESULTS_FILE_SIZE: u64 = 16 * 1024 * 1024;
