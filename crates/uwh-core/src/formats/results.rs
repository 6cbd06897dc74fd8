//! # Result Document Format
//!
//! The JSON layout of the shared result file.
//!
//! ```json
//! {
//!     "save_error": [ { ...record... } ],
//!     "1": {
//!         "white_team": "NZL",
//!         "black_team": "AUS",
//!         "white_score": 3,
//!         "black_score": 2,
//!         "start_time": "18:30:05"
//!     }
//! }
//! ```
//!
//! Keys are stringified game ids. The reserved `save_error` key holds every
//! record that arrived for an id that was already stored. Files written by
//! older versions used `w_team`/`b_team`/`w_score`/`b_score`; those names
//! are accepted on read.
//!
//! Everything here is a pure transformation. File I/O lives in `storage`.

use crate::primitives::{MAX_RESULTS_FILE_SIZE, SAVE_ERROR_KEY};
use crate::UwhError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// RESULT RECORD
// =============================================================================

/// Summary of one finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(alias = "w_team")]
    pub white_team: String,
    #[serde(alias = "b_team")]
    pub black_team: String,
    #[serde(alias = "w_score")]
    pub white_score: u32,
    #[serde(alias = "b_score")]
    pub black_score: u32,
    /// Wall-clock start of the game, `HH:MM:SS`.
    pub start_time: String,
}

// =============================================================================
// RESULT DOCUMENT
// =============================================================================

/// The whole result file: stored games plus colliding records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDocument {
    /// Records whose game id was already taken, in arrival order.
    #[serde(rename = "save_error", default)]
    pub save_errors: Vec<ResultRecord>,
    /// Game id → record.
    #[serde(flatten)]
    pub games: BTreeMap<String, ResultRecord>,
}

/// Result of inserting a record into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// Stored under its key.
    Stored,
    /// Key taken; appended to `save_error`. The stored record is untouched.
    Conflict,
}

impl ResultDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` under `key` without ever overwriting.
    pub fn insert(&mut self, key: &str, record: ResultRecord) -> Insertion {
        if key == SAVE_ERROR_KEY || self.games.contains_key(key) {
            self.save_errors.push(record);
            return Insertion::Conflict;
        }
        self.games.insert(key.to_string(), record);
        Insertion::Stored
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ResultRecord> {
        self.games.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty() && self.save_errors.is_empty()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a document as pretty JSON with 4-space indentation.
pub fn document_to_bytes(document: &ResultDocument) -> Result<Vec<u8>, UwhError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|e| UwhError::Serialization(e.to_string()))?;
    out.push(b'\n');
    Ok(out)
}

/// Parse a document.
///
/// Size is checked before parsing. Empty or whitespace-only input is an
/// error like any other malformed input; the store decides what to do with
/// it.
pub fn document_from_bytes(bytes: &[u8]) -> Result<ResultDocument, UwhError> {
    if bytes.len() as u64 > MAX_RESULTS_FILE_SIZE {
        return Err(UwhError::Serialization(format!(
            "Result file size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_RESULTS_FILE_SIZE
        )));
    }

    serde_json::from_slice(bytes)
        .map_err(|e| UwhError::Serialization(format!("Failed to parse result document: {}", e)))
}

// =============================================================================
// TESTS
// =============================================================================
