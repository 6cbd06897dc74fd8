//! # API Endpoint Handlers
//!
//! Every handler is read-only; the operator terminal is the only writer.

use super::{
    AppState,
    types::{ErrorResponse, HealthResponse},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATE HANDLER
// =============================================================================

/// Current scoreboard.
pub async fn state_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.display.borrow().clone();
    (StatusCode::OK, Json(snapshot))
}

// =============================================================================
// FALLBACK
// =============================================================================

/// Unknown route.
pub async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Not found. Available: GET /health, GET /state")),
    )
}
