//! # Core Type Definitions
//!
//! This module contains the small shared types of the uwh engine:
//! - Identifiers (`GameId`)
//! - Team sides (`Side`)
//! - Error types (`UwhError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` where they are used as map keys

use crate::system::Stage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Game number, the unique key of a stored result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub u32);

impl GameId {
    /// The key under which this game is stored in the result document.
    #[must_use]
    pub fn key(&self) -> String {
        self.0.to_string()
    }

    /// Label shown by the display ("Game no. N").
    #[must_use]
    pub fn label(&self) -> String {
        format!("Game no. {}", self.0)
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// SIDES
// =============================================================================

/// One of the two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// Get the side name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

impl std::str::FromStr for Side {
    type Err = UwhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Side::White),
            "b" | "black" => Ok(Side::Black),
            other => Err(UwhError::Config(format!("Unknown side '{}'", other))),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the uwh engine.
///
/// - No silent failures
/// - Use `Result<T, UwhError>` for fallible operations
/// - The engine never panics; a save conflict or a declined confirmation is
///   an outcome, not an error
#[derive(Debug, Error)]
pub enum UwhError {
    /// A configuration field is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A tick observed a stage it cannot evaluate (construction bug).
    #[error("Stage invariant violated in {stage}: {reason}")]
    StageInvariant {
        /// Stage the machine was in.
        stage: Stage,
        /// What was missing.
        reason: String,
    },

    /// A timeout was called or resumed in the wrong state.
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
