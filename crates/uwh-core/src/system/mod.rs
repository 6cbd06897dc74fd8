//! # System Module
//!
//! The stage machine: match periods, their kinds and the transition table.
//!
//! The machine is pure and deterministic. It never reads the clock itself;
//! it is handed the elapsed seconds of the current stage and the tie state,
//! and answers with at most one transition.

mod stage;

pub use stage::*;
