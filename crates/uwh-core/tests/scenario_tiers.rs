//! # Scenario Tier Tests (T0-T3)
//!
//! End-to-end runs of whole matches against a real result file.
//!
//! ## Tiers
//! - T0: Regular time
//! - T1: Golden goal
//! - T2: Extra time
//! - T3: Result persistence

use chrono::NaiveTime;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use uwh_core::{
    Always, ExtraTime, GameConfig, GameEngine, GameId, OvertimeMode, ResultDocument,
    ResultRecord, ResultSink, ResultStore, ScoreOutcome, Side, Stage, StageKind, TickOutcome,
    TimeUnit,
};

fn config(overtime: OvertimeMode, extra: Option<ExtraTime>) -> GameConfig {
    GameConfig::new(10, 2, overtime, extra)
        .expect("valid config")
        .with_unit(TimeUnit::Seconds)
}

fn kickoff() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 5, 0).expect("time")
}

fn at(t0: Instant, secs: u64) -> Instant {
    t0 + Duration::from_secs(secs)
}

/// Tick once per second from `from` to `to` inclusive, collecting stages entered.
fn run<S: ResultSink>(engine: &mut GameEngine<S>, t0: Instant, from: u64, to: u64) -> Vec<Stage> {
    let mut entered = Vec::new();
    for s in from..=to {
        for outcome in engine.catch_up(at(t0, s)).expect("tick") {
            match outcome {
                TickOutcome::Transitioned { to, .. } => entered.push(to),
                TickOutcome::Finished(_) => entered.push(Stage::GameOver),
                TickOutcome::Idle | TickOutcome::Paused => {}
            }
        }
    }
    entered
}

// =============================================================================
// TIER T0: REGULAR TIME
// =============================================================================

mod t0_regular_time {
    use super::*;

    /// T0.1: half=10, half_time=2, no overtime, one save at 22 s.
    #[test]
    fn no_overtime_match() {
        let t0 = Instant::now();
        let mut engine = GameEngine::new(
            config(OvertimeMode::None, None),
            ResultDocument::new(),
            t0,
            kickoff(),
        );

        assert_eq!(run(&mut engine, t0, 0, 9), vec![]);
        assert_eq!(run(&mut engine, t0, 10, 10), vec![Stage::HalfTime]);
        assert_eq!(engine.clock().target(), 2);

        assert_eq!(run(&mut engine, t0, 11, 12), vec![Stage::SecondHalf]);
        assert_eq!(engine.clock().target(), 10);

        assert_eq!(run(&mut engine, t0, 13, 22), vec![Stage::GameOver]);
        assert_eq!(engine.sink().len(), 1);
        assert!(engine.sink().save_errors.is_empty());
    }

    /// T0.2: A tied second half without overtime still ends the match.
    #[test]
    fn tie_without_overtime_ends() {
        let t0 = Instant::now();
        let mut engine = GameEngine::new(
            config(OvertimeMode::None, None),
            ResultDocument::new(),
            t0,
            kickoff(),
        );
        run(&mut engine, t0, 0, 22);
        assert!(engine.is_over());
        assert_eq!(
            engine.sink().get("1").map(|r| (r.white_score, r.black_score)),
            Some((0, 0))
        );
    }

    /// T0.3: A goal at half-time asks, and a no leaves the score alone.
    #[test]
    fn half_time_goal_needs_confirmation() {
        let t0 = Instant::now();
        let mut engine = GameEngine::new(
            config(OvertimeMode::None, None),
            ResultDocument::new(),
            t0,
            kickoff(),
        );
        run(&mut engine, t0, 0, 10);

        let mut asked = Vec::new();
        let mut confirm = |stage: Stage, kind: StageKind| {
            asked.push((stage, kind));
            false
        };
        let outcome = engine
            .add_score(Side::White, &mut confirm)
            .expect("score");

        assert_eq!(outcome, ScoreOutcome::Declined);
        assert_eq!(asked, vec![(Stage::HalfTime, StageKind::Break)]);
        assert_eq!(engine.scores().white(), 0);
    }
}

// =============================================================================
// TIER T1: GOLDEN GOAL
// =============================================================================

mod t1_golden_goal {
    use super::*;

    /// T1.1: Tied at the end of the second half, first goal wins.
    #[test]
    fn tied_match_goes_to_golden_goal() {
        let t0 = Instant::now();
        let mut engine = GameEngine::new(
            config(OvertimeMode::GoldenGoal, None),
            ResultDocument::new(),
            t0,
            kickoff(),
        );

        run(&mut engine, t0, 0, 22);
        assert_eq!(engine.stage(), Stage::GoldenGoal);
        assert_eq!(engine.clock().target(), 0);

        // No clock rule ends golden goal.
        assert_eq!(run(&mut engine, t0, 23, 400), vec![]);

        let outcome = engine
            .add_score(Side::White, &mut Always(false))
            .expect("score");
        assert!(outcome.is_added());
        assert!(engine.is_over());
        assert_eq!(engine.sink().len(), 1);
    }

    /// T1.2: Scores differ at the end of the second half, no golden goal.
    #[test]
    fn decided_match_skips_golden_goal() {
        let t0 = Instant::now();
        let mut engine = GameEngine::new(
            config(OvertimeMode::GoldenGoal, None),
            ResultDocument::new(),
            t0,
            kickoff(),
        );
        run(&mut engine, t0, 0, 15);
        engine
            .add_score(Side::Black, &mut Always(true))
            .expect("score");

        assert_eq!(run(&mut engine, t0, 16, 22), vec![Stage::GameOver]);
    }
}

// =============================================================================
// TIER T2: EXTRA TIME
// =============================================================================

mod t2_extra_time {
    use super::*;

    fn extra() -> Option<ExtraTime> {
        Some(ExtraTime {
            half_duration: 5,
            break_duration: 1,
        })
    }

    /// T2.1: Tied through extra time ends in golden goal.
    #[test]
    fn full_extra_time_sequence() {
        let t0 = Instant::now();
        let mut engine = GameEngine::new(
            config(OvertimeMode::ExtraTime, extra()),
            ResultDocument::new(),
            t0,
            kickoff(),
        );

        assert_eq!(
            run(&mut engine, t0, 0, 34),
            vec![
                Stage::HalfTime,
                Stage::SecondHalf,
                Stage::ExtraTimeBreak,
                Stage::ExtraTime1,
                Stage::ExtraHalfTime,
                Stage::ExtraTime2,
                Stage::GoldenGoal,
            ]
        );
    }

    /// T2.2: A goal in extra time decides the match at the end of ET2.
    #[test]
    fn extra_time_goal_ends_at_full_time() {
        let t0 = Instant::now();
        let mut engine = GameEngine::new(
            config(OvertimeMode::ExtraTime, extra()),
            ResultDocument::new(),
            t0,
            kickoff(),
        );
        run(&mut engine, t0, 0, 25);
        assert_eq!(engine.stage(), Stage::ExtraTime1);
        engine
            .add_score(Side::White, &mut Always(true))
            .expect("score");
        assert!(!engine.is_over());

        assert_eq!(
            run(&mut engine, t0, 26, 34),
            vec![Stage::ExtraHalfTime, Stage::ExtraTime2, Stage::GameOver]
        );
    }

    /// T2.3: A timeout during extra time pushes the end back.
    #[test]
    fn timeout_delays_transitions() {
        let t0 = Instant::now();
        let mut engine = GameEngine::new(
            config(OvertimeMode::ExtraTime, extra()),
            ResultDocument::new(),
            t0,
            kickoff(),
        );
        run(&mut engine, t0, 0, 24);
        engine.call_timeout(at(t0, 24)).expect("timeout");
        assert_eq!(run(&mut engine, t0, 25, 60), vec![]);
        assert_eq!(engine.resume(at(t0, 60)).expect("resume"), 36);

        // ET1 started at 23 and had 1 s played before the timeout.
        assert_eq!(run(&mut engine, t0, 61, 63), vec![]);
        assert_eq!(run(&mut engine, t0, 64, 64), vec![Stage::ExtraHalfTime]);
    }
}

// =============================================================================
// TIER T3: RESULT PERSISTENCE
// =============================================================================

mod t3_persistence {
    use super::*;

    fn play_to_end(store: ResultStore, game: u32, white_goals: u32) -> GameEngine<ResultStore> {
        let t0 = Instant::now();
        let cfg = config(OvertimeMode::None, None)
            .with_game_id(GameId(game))
            .with_teams("NZL", "AUS");
        let mut engine = GameEngine::new(cfg, store, t0, kickoff());
        for _ in 0..white_goals {
            engine
                .add_score(Side::White, &mut Always(true))
                .expect("score");
        }
        run(&mut engine, t0, 0, 22);
        engine
    }

    /// T3.1: Game 5 saved twice keeps the first and isolates the second.
    #[test]
    fn game_saved_twice() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("results.json");

        let first = play_to_end(ResultStore::open(&path), 5, 1);
        assert!(!first.save_outcome().expect("saved").is_conflict());

        let second = play_to_end(ResultStore::open(&path), 5, 3);
        let outcome = second.save_outcome().expect("saved");
        assert!(outcome.is_conflict());
        assert_eq!(
            outcome.conflict_message().as_deref(),
            Some("Could not save, results for game no. 5 already exists")
        );

        let doc = ResultStore::open(&path).load().expect("load");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("5").map(|r| r.white_score), Some(1));
        assert_eq!(doc.save_errors.len(), 1);
        assert_eq!(doc.save_errors[0].white_score, 3);
    }

    /// T3.2: The written record matches the match.
    #[test]
    fn record_contents() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("results.json");
        play_to_end(ResultStore::open(&path), 2, 2);

        let doc = ResultStore::open(&path).load().expect("load");
        assert_eq!(
            doc.get("2"),
            Some(&ResultRecord {
                white_team: "NZL".to_string(),
                black_team: "AUS".to_string(),
                white_score: 2,
                black_score: 0,
                start_time: "14:05:00".to_string(),
            })
        );
    }

    /// T3.3: A corrupt file is backed up and the new result still lands.
    #[test]
    fn corrupt_store_recovers() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("results.json");
        std::fs::write(&path, "{\"1\": ").expect("seed");

        let engine = play_to_end(ResultStore::open(&path), 1, 0);
        let recovery = engine
            .save_outcome()
            .and_then(|o| o.recovered.clone())
            .expect("recovered");
        assert!(recovery.backup.expect("backup").exists());

        let doc = ResultStore::open(&path).load().expect("load");
        assert_eq!(doc.len(), 1);
    }
}
