//! # uwh Display Feed
//!
//! A read-only HTTP view of the running match, for scoreboards and
//! streaming overlays.
//!
//! ## Endpoints
//!
//! - `GET /state` - Current scoreboard (`DisplayState`)
//! - `GET /health` - Health check
//!
//! ## Configuration (Environment Variables)
//!
//! - `UWH_CORS_ORIGINS`: Comma-separated list of allowed origins (default: any localhost port)

mod handlers;
mod types;

// Re-export handlers and types for integration tests (via `uwh::api::*`)
pub use handlers::{health_handler, not_found_handler, state_handler};
pub use types::{ErrorResponse, HealthResponse};

use axum::{
    Router,
    http::{HeaderValue, Method, request::Parts},
    routing::get,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use uwh_core::{DisplayState, UwhError};

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the latest published scoreboard.
#[derive(Clone)]
pub struct AppState {
    pub display: watch::Receiver<DisplayState>,
}

impl AppState {
    #[must_use]
    pub fn new(display: watch::Receiver<DisplayState>) -> Self {
        Self { display }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// GET-only CORS. `UWH_CORS_ORIGINS` (comma separated) replaces the default,
/// which accepts any localhost origin on any port.
fn cors_layer() -> CorsLayer {
    let listed: Vec<HeaderValue> = std::env::var("UWH_CORS_ORIGINS")
        .map(|origins| {
            origins
                .split(',')
                .filter_map(|origin| match origin.trim() {
                    "" | "*" => None,
                    origin => origin.parse().ok(),
                })
                .collect()
        })
        .unwrap_or_default();

    let allow = if listed.is_empty() {
        AllowOrigin::predicate(|origin: &HeaderValue, _: &Parts| is_local_origin(origin))
    } else {
        AllowOrigin::list(listed)
    };

    CorsLayer::new().allow_origin(allow).allow_methods([Method::GET])
}

/// True for `http(s)://localhost[:port]` and `http(s)://127.0.0.1[:port]`.
fn is_local_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    let Some(host) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };
    let host = host.split(':').next().unwrap_or_default();
    matches!(host, "localhost" | "127.0.0.1")
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router. GET routes only.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/state", get(handlers::state_handler))
        .fallback(handlers::not_found_handler)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind the display feed address. Done before the match starts so a bad
/// address is reported during setup.
pub async fn bind_display(addr: &str) -> Result<TcpListener, UwhError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| UwhError::Io(format!("Bind failed on {}: {}", addr, e)))?;
    tracing::info!("Display feed listening on http://{}", addr);
    Ok(listener)
}

/// Serve the display feed until the task is dropped.
pub async fn serve_display(listener: TcpListener, state: AppState) -> Result<(), UwhError> {
    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| UwhError::Io(format!("Display feed error: {}", e)))
}
