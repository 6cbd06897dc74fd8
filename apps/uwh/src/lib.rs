//! # uwh
//!
//! The async shell around `uwh-core`: CLI, setup files, the game runner and
//! the read-only display feed.

pub mod api;
pub mod cli;
pub mod runner;
pub mod settings;
