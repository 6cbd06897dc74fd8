//! Integration tests for the uwh display feed.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::{HeaderValue, header};
use axum_test::TestServer;
use chrono::NaiveTime;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use uwh::api::{AppState, ErrorResponse, HealthResponse, create_router};
use uwh_core::{
    Always, DisplayState, GameConfig, GameEngine, OvertimeMode, ResultDocument, Side, TimeUnit,
};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn engine() -> (GameEngine<ResultDocument>, Instant) {
    let config = GameConfig::new(10, 2, OvertimeMode::GoldenGoal, None)
        .unwrap()
        .with_unit(TimeUnit::Seconds)
        .with_teams("NZL", "AUS");
    let t0 = Instant::now();
    (
        GameEngine::new(
            config,
            ResultDocument::new(),
            t0,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        ),
        t0,
    )
}

fn wall() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 4).unwrap()
}

/// Create a test server fed by a fresh display channel.
fn create_test_server() -> (TestServer, watch::Sender<DisplayState>, GameEngine<ResultDocument>, Instant) {
    let (engine, t0) = engine();
    let (tx, rx) = watch::channel(DisplayState::capture(&engine, t0, wall()));
    let router = create_router(AppState::new(rx));
    (TestServer::new(router).unwrap(), tx, engine, t0)
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _tx, _engine, _t0) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// STATE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_state_initial_snapshot() {
    let (server, _tx, _engine, _t0) = create_test_server();

    let response = server.get("/state").await;

    response.assert_status_ok();
    let state: DisplayState = response.json();
    assert_eq!(state.stage_label, "First Half");
    assert_eq!(state.clock, "00:10");
    assert_eq!(state.white_team, "NZL");
    assert_eq!(state.black_team, "AUS");
    assert_eq!(state.game_label, "Game no. 1");
    assert_eq!(state.wall_clock, "09:00:04");
    assert!(!state.game_over);
}

#[tokio::test]
async fn test_state_follows_published_updates() {
    let (server, tx, mut engine, t0) = create_test_server();

    engine.add_score(Side::Black, &mut Always(true)).unwrap();
    let now = t0 + Duration::from_secs(3);
    tx.send_replace(DisplayState::capture(&engine, now, wall()));

    let state: DisplayState = server.get("/state").await.json();
    assert_eq!(state.black_score, 1);
    assert_eq!(state.clock, "00:07");
}

#[tokio::test]
async fn test_state_after_golden_goal() {
    let (server, tx, mut engine, t0) = create_test_server();

    engine.catch_up(t0 + Duration::from_secs(22)).unwrap();
    engine.add_score(Side::White, &mut Always(true)).unwrap();
    tx.send_replace(DisplayState::capture(
        &engine,
        t0 + Duration::from_secs(30),
        wall(),
    ));

    let state: DisplayState = server.get("/state").await.json();
    assert!(state.game_over);
    assert_eq!(state.stage_label, "Game Over");
    assert_eq!(state.kind, None);
    assert_eq!(state.clock, "00:00");
}

// =============================================================================
// READ-ONLY TESTS
// =============================================================================

#[tokio::test]
async fn test_state_rejects_writes() {
    let (server, _tx, _engine, _t0) = create_test_server();

    let response = server.post("/state").await;
    response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let (server, _tx, _engine, _t0) = create_test_server();

    let response = server.get("/score").await;
    response.assert_status_not_found();
    let body: ErrorResponse = response.json();
    assert!(body.error.contains("/state"));
}

// =============================================================================
// CORS TESTS
// =============================================================================

#[tokio::test]
async fn test_cors_allows_localhost_any_port() {
    let (server, _tx, _engine, _t0) = create_test_server();

    let response = server
        .get("/state")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:5173"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("http://localhost:5173"))
    );
}

#[tokio::test]
async fn test_cors_ignores_foreign_origin() {
    let (server, _tx, _engine, _t0) = create_test_server();

    let response = server
        .get("/state")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://example.org"))
        .await;

    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
