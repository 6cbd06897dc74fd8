//! # uwh CLI Module
//!
//! This module implements the CLI interface for uwh.
//!
//! ## Available Commands
//!
//! - `play` - Set up a match and run the game clock
//! - `check` - Validate a setup and print the match length
//! - `results` - List stored results and save conflicts

mod commands;

use crate::settings;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uwh_core::primitives::DEFAULT_RESULTS_PATH;
use uwh_core::{FieldValue, SetupForm, UwhError};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// uwh - Underwater hockey game clock
///
/// Runs the halves, breaks and overtime of one match, keeps the score and
/// writes the final result to a shared JSON file.
#[derive(Parser, Debug)]
#[command(name = "uwh")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set up a match and run it
    Play {
        #[command(flatten)]
        setup: SetupArgs,

        /// Path to the result file
        #[arg(short = 'R', long, default_value = DEFAULT_RESULTS_PATH)]
        results: PathBuf,

        /// Serve the read-only display feed on this address (e.g. 127.0.0.1:8080)
        #[arg(long)]
        display_addr: Option<String>,
    },

    /// Validate a setup and print the match length
    Check {
        #[command(flatten)]
        setup: SetupArgs,
    },

    /// List stored results
    Results {
        /// Path to the result file
        #[arg(short = 'R', long, default_value = DEFAULT_RESULTS_PATH)]
        results: PathBuf,
    },
}

/// Match setup: a TOML file, flags, or both (flags win).
#[derive(Args, Debug, Default, Clone)]
pub struct SetupArgs {
    /// Setup file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Time per half
    #[arg(long = "half")]
    pub game_length: Option<String>,

    /// Half-time length
    #[arg(long = "half-time")]
    pub half_time_length: Option<String>,

    /// Overtime procedure: "No Overtime", "Extra Time" or "Golden Goal"
    #[arg(long)]
    pub overtime: Option<String>,

    /// Extra time per half (Extra Time only)
    #[arg(long = "extra-half")]
    pub extra_time_length: Option<String>,

    /// Break before and between the extra halves (Extra Time only)
    #[arg(long = "extra-break")]
    pub extra_time_break: Option<String>,

    /// White team name
    #[arg(long = "white")]
    pub white_team: Option<String>,

    /// Black team name
    #[arg(long = "black")]
    pub black_team: Option<String>,

    /// Game number, the key of the stored result
    #[arg(short = 'g', long)]
    pub game_id: Option<String>,

    /// Unit of every duration: "minutes" or "seconds"
    #[arg(long)]
    pub unit: Option<String>,
}

impl SetupArgs {
    /// Build the raw setup form: file first, then flags on top.
    pub fn to_form(&self) -> Result<SetupForm, UwhError> {
        let base = match &self.config {
            Some(path) => settings::load_setup_file(path)?,
            None => SetupForm::default(),
        };

        let text = |v: &Option<String>| v.as_deref().map(FieldValue::from);
        let flags = SetupForm {
            game_length: text(&self.game_length),
            half_time_length: text(&self.half_time_length),
            overtime: self.overtime.clone(),
            extra_time_length: text(&self.extra_time_length),
            extra_time_break: text(&self.extra_time_break),
            white_team: self.white_team.clone(),
            black_team: self.black_team.clone(),
            game_id: text(&self.game_id),
            unit: self.unit.clone(),
        };

        Ok(settings::merge(base, flags))
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), UwhError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Play {
            setup,
            results,
            display_addr,
        } => cmd_play(&setup, &results, display_addr.as_deref(), json_mode).await,
        Commands::Check { setup } => cmd_check(&setup, json_mode),
        Commands::Results { results } => cmd_results(&results, json_mode),
    }
}
