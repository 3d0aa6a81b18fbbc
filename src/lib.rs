//! stemd library interface
//!
//! Exposes the router, state, and services for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{JobTracker, ToolSuite};
use crate::store::StatusStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration
    pub config: Arc<Config>,
    /// Session status persistence
    pub store: StatusStore,
    /// External tool seam (real commands in production, fakes in tests)
    pub tools: Arc<dyn ToolSuite>,
    /// In-flight background jobs, keyed by session id
    pub jobs: JobTracker,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config, store: StatusStore, tools: Arc<dyn ToolSuite>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            tools,
            jobs: JobTracker::new(),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// CORS stays permissive: the client is a mobile app polling from arbitrary
/// origins.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::convert_routes())
        .merge(api::status_routes())
        .merge(api::download_routes())
        .merge(api::cleanup_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
