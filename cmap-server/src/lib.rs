//! cmap-server library - Community Map service
//!
//! Turns an uploaded member CSV into a standalone interactive HTML map.

pub mod api;
pub mod error;
pub mod geocode;
pub mod pipeline;
pub mod render;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::geocode::CoordinateResolver;

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Geocoder used to backfill missing coordinates
    pub resolver: Arc<dyn CoordinateResolver>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(resolver: Arc<dyn CoordinateResolver>) -> Self {
        Self {
            resolver,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::generate_routes())
        .merge(api::health_routes())
        .merge(api::buildinfo_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
