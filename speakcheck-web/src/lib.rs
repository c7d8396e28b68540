//! speakcheck-web library
//!
//! Spoken-English assessment service: users log in, record an answer in the
//! browser, the server has it scored by the speech-assessment API and stores
//! the verdict; administrators browse and filter stored results.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod ui;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::services::AssessmentProvider;
use crate::session::SessionStore;

/// Largest accepted request body (base64 audio included)
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Assessment store
    pub db: SqlitePool,
    /// Server-side sessions keyed by cookie id
    pub sessions: SessionStore,
    /// Speech-assessment backend
    pub assessor: Arc<dyn AssessmentProvider>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, assessor: Arc<dyn AssessmentProvider>) -> Self {
        Self {
            db,
            sessions: SessionStore::new(),
            assessor,
            startup_time: Utc::now(),
        }
    }

    /// Replace the session store with one using `ttl` as idle timeout
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.sessions = SessionStore::with_ttl(ttl);
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::index_page))
        .route("/login", post(api::login))
        .route("/logout", get(api::logout))
        .route("/assessment", get(api::assessment_page))
        .route("/submit_assessment", post(api::submit_assessment))
        .route("/admin", get(api::admin_dashboard))
        .route("/admin/detail/:id", get(api::admin_detail))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
