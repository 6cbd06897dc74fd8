//! # uwh-core
//!
//! The game engine for uwh - THE LOGIC.
//!
//! This crate drives one underwater-hockey match through its ordered stages
//! (halves, breaks, extra time, golden goal), keeps the score and writes the
//! final result to a shared JSON document.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Has NO async, NO network dependencies (pure Rust)
//! - Never reads the system clock; every time-dependent call takes `now`
//! - Never initiates interaction; only reacts to ticks and score events
//! - Writes each game's result exactly once

// =============================================================================
// MODULES
// =============================================================================

pub mod clock;
pub mod config;
pub mod display;
pub mod engine;
pub mod formats;
pub mod primitives;
pub mod score;
pub mod storage;
pub mod system;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{GameId, Side, UwhError};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use clock::Clock;
pub use config::{
    ExtraTime, FieldValue, GameConfig, GameLength, OvertimeLength, OvertimeMode, SetupForm,
    TimeUnit, validate_int,
};
pub use display::{DisplayState, format_clock};
pub use engine::{GameEngine, TickOutcome};
pub use score::{Always, Confirm, ScoreOutcome, ScoreTracker};
pub use storage::{ResultSink, ResultStore, SaveOutcome, SaveStatus, StoreRecovery};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{
    Insertion, ResultDocument, ResultRecord, document_from_bytes, document_to_bytes,
};

// =============================================================================
// RE-EXPORTS: System (from system module)
// =============================================================================

pub use system::{Stage, StageDurations, StageKind, StageMachine, Transition};
