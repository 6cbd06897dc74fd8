//! # Setup Files
//!
//! Reads a match setup from TOML and merges it with command-line flags.
//!
//! ```toml
//! game_length = 15
//! half_time_length = 3
//! overtime = "Extra Time"
//! extra_time_length = 5
//! extra_time_break = 1
//! white_team = "NZL"
//! black_team = "AUS"
//! game_id = 12
//! unit = "minutes"
//! ```
//!
//! Every field is optional here; `GameConfig::from_setup` decides what is
//! required.

use std::path::Path;
use uwh_core::{SetupForm, UwhError};

/// Maximum size of a setup file (64 KB).
const MAX_SETUP_FILE_SIZE: u64 = 64 * 1024;

/// Parse setup text.
pub fn parse_setup(text: &str) -> Result<SetupForm, UwhError> {
    toml::from_str(text).map_err(|e| UwhError::Config(format!("Invalid setup file: {}", e)))
}

/// Read and parse a setup file.
pub fn load_setup_file(path: &Path) -> Result<SetupForm, UwhError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        UwhError::Io(format!(
            "Cannot read setup file '{}': {}",
            path.display(),
            e
        ))
    })?;

    if metadata.len() > MAX_SETUP_FILE_SIZE {
        return Err(UwhError::Config(format!(
            "Setup file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_SETUP_FILE_SIZE
        )));
    }

    let text = std::fs::read_to_string(path).map_err(|e| {
        UwhError::Io(format!(
            "Cannot read setup file '{}': {}",
            path.display(),
            e
        ))
    })?;

    tracing::debug!(path = %path.display(), "Loaded setup file");
    parse_setup(&text)
}

/// Fields set in `overrides` replace those in `base`.
#[must_use]
pub fn merge(base: SetupForm, overrides: SetupForm) -> SetupForm {
    SetupForm {
        game_length: overrides.game_length.or(base.game_length),
        half_time_length: overrides.half_time_length.or(base.half_time_length),
        overtime: overrides.overtime.or(base.overtime),
        extra_time_length: overrides.extra_time_length.or(base.extra_time_length),
        extra_time_break: overrides.extra_time_break.or(base.extra_time_break),
        white_team: overrides.white_team.or(base.white_team),
        black_team: overrides.black_team.or(base.black_team),
        game_id: overrides.game_id.or(base.game_id),
        unit: overrides.unit.or(base.unit),
    }
}
