//! relay-server library interface
//!
//! Exposes the router, state, and aggregation services for the binary and
//! for integration testing.

pub mod api;
pub mod catalog;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::services::ArtistAggregator;

/// Module name reported by `/health`
pub const MODULE_NAME: &str = "artist-relay";

/// Application state shared across handlers
///
/// Holds nothing request-specific: each search builds its own records and
/// fan-out state.
#[derive(Clone)]
pub struct AppState {
    /// Search → related → top-tracks pipeline
    pub aggregator: ArtistAggregator,
    /// Directory served for paths no route matches
    pub public_dir: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(aggregator: ArtistAggregator, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            aggregator,
            public_dir: public_dir.into(),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// API routes first; everything else falls through to the static front end.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.public_dir);

    Router::new()
        .merge(api::search_routes())
        .merge(api::health_routes())
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
