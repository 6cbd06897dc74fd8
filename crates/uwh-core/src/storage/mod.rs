//! # Storage Module
//!
//! Persistence of finished games.
//!
//! - `ResultSink`: the engine's only seam to persistence.
//! - `ResultStore`: the JSON file implementation.
//!
//! The engine calls `save` exactly once per game.

mod json_store;

pub use json_store::{ResultSink, ResultStore, SaveOutcome, SaveStatus, StoreRecovery};
