//! # JSON Result Store
//!
//! A single JSON document on disk holding every finished game.
//!
//! Each save reads the whole document, inserts one record and rewrites the
//! whole document. That is O(records) per save, which is fine for a
//! handful of saves per process.
//!
//! ## Recovery
//!
//! - Missing file: start from an empty document.
//! - Unparsable file: the bytes are copied to `<path>.corrupt-<unix-secs>`,
//!   then the store starts from an empty document. The recovery is logged
//!   and reported in the `SaveOutcome` so the operator sees it.
//! - Existing key: the record goes to `save_error`, the stored record is
//!   kept, and the outcome is a conflict.

use crate::formats::{
    Insertion, ResultDocument, ResultRecord, document_from_bytes, document_to_bytes,
};
use crate::{GameId, UwhError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// SAVE OUTCOME
// =============================================================================

/// Whether the record landed under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveStatus {
    Saved,
    Conflict,
}

/// The store had to be reset before saving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecovery {
    /// Why the existing document was unusable.
    pub reason: String,
    /// Where the unusable bytes were copied, if there were any.
    pub backup: Option<PathBuf>,
}

/// Result of one save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub game_id: GameId,
    pub status: SaveStatus,
    pub recovered: Option<StoreRecovery>,
}

impl SaveOutcome {
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status == SaveStatus::Conflict
    }

    /// Operator-facing message for a conflict.
    #[must_use]
    pub fn conflict_message(&self) -> Option<String> {
        self.is_conflict().then(|| {
            format!(
                "Could not save, results for game no. {} already exists",
                self.game_id
            )
        })
    }
}

// =============================================================================
// RESULT SINK
// =============================================================================

/// Where a finished game's record goes.
pub trait ResultSink {
    /// Persist `record` under `game_id` without overwriting an existing one.
    fn save(&mut self, game_id: GameId, record: &ResultRecord) -> Result<SaveOutcome, UwhError>;
}

/// In-memory sink: the document itself.
impl ResultSink for ResultDocument {
    fn save(&mut self, game_id: GameId, record: &ResultRecord) -> Result<SaveOutcome, UwhError> {
        let status = match self.insert(&game_id.key(), record.clone()) {
            Insertion::Stored => SaveStatus::Saved,
            Insertion::Conflict => SaveStatus::Conflict,
        };
        Ok(SaveOutcome {
            game_id,
            status,
            recovered: None,
        })
    }
}

// =============================================================================
// RESULT STORE
// =============================================================================

/// File-backed result store.
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    /// Point a store at `path`. The file is not touched until a save.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document without modifying anything.
    ///
    /// A missing file is an empty document; a corrupt one is an error.
    pub fn load(&self) -> Result<ResultDocument, UwhError> {
        match self.read_bytes()? {
            None => Ok(ResultDocument::new()),
            Some(bytes) => document_from_bytes(&bytes),
        }
    }

    /// Read the document for writing, resetting it if it is unusable.
    fn load_for_save(&self) -> Result<(ResultDocument, Option<StoreRecovery>), UwhError> {
        let Some(bytes) = self.read_bytes()? else {
            return Ok((ResultDocument::new(), None));
        };

        match document_from_bytes(&bytes) {
            Ok(document) => Ok((document, None)),
            Err(e) => {
                let backup = if bytes.iter().all(u8::is_ascii_whitespace) {
                    None
                } else {
                    Some(self.backup_corrupt(&bytes)?)
                };
                tracing::warn!(
                    path = %self.path.display(),
                    backup = ?backup,
                    "Result store unreadable, starting from an empty document: {}",
                    e
                );
                Ok((
                    ResultDocument::new(),
                    Some(StoreRecovery {
                        reason: e.to_string(),
                        backup,
                    }),
                ))
            }
        }
    }

    fn read_bytes(&self) -> Result<Option<Vec<u8>>, UwhError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(UwhError::Io(format!(
                "Cannot read result store '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn backup_corrupt(&self, bytes: &[u8]) -> Result<PathBuf, UwhError> {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".corrupt-{}", chrono::Utc::now().timestamp()));
        let backup = PathBuf::from(name);

        std::fs::write(&backup, bytes).map_err(|e| {
            UwhError::Io(format!(
                "Cannot back up unreadable result store to '{}': {}",
                backup.display(),
                e
            ))
        })?;
        Ok(backup)
    }

    /// Rewrite the whole document: temp file next to the target, then rename.
    fn write(&self, document: &ResultDocument) -> Result<(), UwhError> {
        let data = document_to_bytes(document)?;

        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        std::fs::write(&tmp, &data).map_err(|e| {
            UwhError::Io(format!("Cannot write '{}': {}", tmp.display(), e))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                tracing::warn!(path = %tmp.display(), "Cannot remove temp file: {}", cleanup);
            }
            UwhError::Io(format!(
                "Cannot replace result store '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl ResultSink for ResultStore {
    fn save(&mut self, game_id: GameId, record: &ResultRecord) -> Result<SaveOutcome, UwhError> {
        let (mut document, recovered) = self.load_for_save()?;

        let mut outcome = document.save(game_id, record)?;
        outcome.recovered = recovered;

        if outcome.is_conflict() {
            tracing::warn!(
                game = %game_id,
                conflicts = document.save_errors.len(),
                "Result for game already stored; record kept in save_error"
            );
        } else {
            tracing::info!(game = %game_id, "Result saved");
        }

        self.write(&document)?;
        Ok(outcome)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(white: u32, black: u32) -> ResultRecord {
        ResultRecord {
            white_team: "WHITE TEAM".to_string(),
            black_team: "BLACK TEAM".to_string(),
            white_score: white,
            black_score: black,
            start_time: "10:00:00".to_string(),
        }
    }

    fn store_in(dir: &TempDir) -> ResultStore {
        ResultStore::open(dir.path().join("results.json"))
    }

    #[test]
    fn save_creates_missing_file() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = store_in(&dir);

        let outcome = store.save(GameId(1), &record(2, 1)).expect("save");
        assert_eq!(outcome.status, SaveStatus::Saved);
        assert_eq!(outcome.recovered, None);

        let doc = store.load().expect("load");
        assert_eq!(doc.get("1"), Some(&record(2, 1)));
        assert!(doc.save_errors.is_empty());
    }

    #[test]
    fn second_save_of_same_id_conflicts() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = store_in(&dir);

        let first = store.save(GameId(5), &record(1, 0)).expect("first");
        let second = store.save(GameId(5), &record(3, 3)).expect("second");

        assert!(!first.is_conflict());
        assert!(second.is_conflict());
        assert_eq!(
            second.conflict_message().as_deref(),
            Some("Could not save, results for game no. 5 already exists")
        );

        let doc = store.load().expect("load");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("5"), Some(&record(1, 0)));
        assert_eq!(doc.save_errors, vec![record(3, 3)]);
    }

    #[test]
    fn corrupt_file_is_backed_up_and_reset() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = store_in(&dir);
        std::fs::write(store.path(), b"{ not json").expect("seed");

        let outcome = store.save(GameId(2), &record(0, 1)).expect("save");
        let recovery = outcome.recovered.expect("recovered");
        let backup = recovery.backup.expect("backup written");
        assert_eq!(std::fs::read(&backup).expect("read backup"), b"{ not json");

        let doc = store.load().expect("load");
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn empty_file_resets_without_backup() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = store_in(&dir);
        std::fs::write(store.path(), b"").expect("seed");

        let outcome = store.save(GameId(1), &record(0, 0)).expect("save");
        let recovery = outcome.recovered.expect("recovered");
        assert_eq!(recovery.backup, None);
    }

    #[test]
    fn load_does_not_reset_corrupt_file() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        std::fs::write(store.path(), b"garbage").expect("seed");

        assert!(store.load().is_err());
        assert_eq!(std::fs::read(store.path()).expect("read"), b"garbage");
    }

    #[test]
    fn failed_replace_leaves_no_temp_file() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        // A directory in the way makes the rename fail.
        std::fs::create_dir(store.path()).expect("mkdir");
        std::fs::write(store.path().join("keep"), b"x").expect("seed");

        let err = store.write(&ResultDocument::new()).expect_err("rename fails");
        assert!(err.to_string().contains("Cannot replace result store"));
        assert!(!dir.path().join("results.json.tmp").exists());
    }

    #[test]
    fn in_memory_sink_reports_conflicts() {
        let mut doc = ResultDocument::new();
        assert!(!doc.save(GameId(7), &record(1, 2)).expect("save").is_conflict());
        assert!(doc.save(GameId(7), &record(1, 2)).expect("save").is_conflict());
    }
}
