//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::SetupArgs;
use crate::api;
use crate::runner::{self, RunEnd};
use chrono::Local;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, watch};
use uwh_core::{DisplayState, GameConfig, GameEngine, ResultStore, UwhError};

// =============================================================================
// SETUP
// =============================================================================

/// Validate the setup and print every problem at once.
fn load_config(setup: &SetupArgs) -> Result<GameConfig, UwhError> {
    let form = setup.to_form()?;
    GameConfig::from_setup(&form)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), UwhError> {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| UwhError::Serialization(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// `check --json-mode` output.
#[derive(Serialize)]
struct CheckReport<'a> {
    valid: bool,
    game: String,
    white_team: &'a str,
    black_team: &'a str,
    overtime: &'static str,
    length: String,
    config: &'a GameConfig,
}

/// Validate a setup and show the match length.
pub fn cmd_check(setup: &SetupArgs, json_mode: bool) -> Result<(), UwhError> {
    let config = load_config(setup)?;
    let length = config.length();

    if json_mode {
        return print_json(&CheckReport {
            valid: true,
            game: config.game_id().label(),
            white_team: config.white_team(),
            black_team: config.black_team(),
            overtime: config.overtime().name(),
            length: length.to_string(),
            config: &config,
        });
    }

    println!("uwh Match Setup");
    println!("===============");
    println!("{}: {} vs {}", config.game_id().label(), config.white_team(), config.black_team());
    println!();
    println!(
        "Time per half: {} {}",
        config.half_duration(),
        config.unit().suffix()
    );
    println!(
        "Half-Time:     {} {}",
        config.half_time_duration(),
        config.unit().suffix()
    );
    println!("Overtime:      {}", config.overtime().name());
    if let Some(extra) = config.extra_time() {
        println!(
            "Extra halves:  {} {} (breaks {} {})",
            extra.half_duration,
            config.unit().suffix(),
            extra.break_duration,
            config.unit().suffix()
        );
    }
    println!();
    println!("Game length:   {}", length);

    Ok(())
}

// =============================================================================
// RESULTS COMMAND
// =============================================================================

/// List stored results and save conflicts.
pub fn cmd_results(results: &Path, json_mode: bool) -> Result<(), UwhError> {
    let document = ResultStore::open(results).load()?;

    if json_mode {
        return print_json(&document);
    }

    println!("uwh Results ({})", results.display());
    println!("===========");

    if document.is_empty() {
        println!("No results stored.");
        return Ok(());
    }

    for (key, record) in &document.games {
        println!(
            "Game no. {:>4}  {}  {} {} - {} {}",
            key,
            record.start_time,
            record.white_team,
            record.white_score,
            record.black_score,
            record.black_team
        );
    }

    if !document.save_errors.is_empty() {
        println!();
        println!("Not saved (game number already taken):");
        for record in &document.save_errors {
            println!(
                "  {}  {} {} - {} {}",
                record.start_time,
                record.white_team,
                record.white_score,
                record.black_score,
                record.black_team
            );
        }
    }

    Ok(())
}

// =============================================================================
// PLAY COMMAND
// =============================================================================

/// Set up the match, run it, and wait for the operator to close the clock.
pub async fn cmd_play(
    setup: &SetupArgs,
    results: &Path,
    display_addr: Option<&str>,
    json_mode: bool,
) -> Result<(), UwhError> {
    let config = load_config(setup)?;

    // Bind before the clock starts so a bad address fails the setup.
    let listener = match display_addr {
        Some(addr) => Some(api::bind_display(addr).await?),
        None => None,
    };

    if !json_mode {
        println!(
            "{}: {} vs {} ({})",
            config.game_id().label(),
            config.white_team(),
            config.black_team(),
            config.length()
        );
        println!("Results: {}", results.display());
        println!();
    }

    let engine = GameEngine::new(
        config,
        ResultStore::open(results),
        Instant::now(),
        Local::now().time(),
    );
    let (display, display_rx) = watch::channel(DisplayState::capture(
        &engine,
        Instant::now(),
        Local::now().time(),
    ));
    let engine = Arc::new(Mutex::new(engine));

    let feed = listener.map(|listener| {
        let state = api::AppState::new(display_rx);
        tokio::spawn(async move {
            if let Err(e) = api::serve_display(listener, state).await {
                tracing::error!("{}", e);
            }
        })
    });

    let end = runner::run_game(engine, display, runner::spawn_stdin_reader(), json_mode).await;

    if let Some(feed) = feed {
        feed.abort();
    }

    match end? {
        RunEnd::Closed => tracing::info!("Clock closed"),
        RunEnd::Quit => {
            tracing::warn!("Match abandoned before game over; no result saved");
            if !json_mode {
                println!("Match abandoned. No result was saved.");
            }
        }
    }

    Ok(())
}
