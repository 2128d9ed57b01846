//! csat-server library - customer satisfaction survey service
//!
//! HTTP service collecting multi-step survey submissions, persisting them
//! to SQLite plus an append-only CSV backstop, and exposing a
//! password-gated admin view for analytics, browsing, export, and bulk
//! deletion.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod analytics;
pub mod api;
pub mod db;
pub mod store;

pub use store::{CsvSink, Store};

/// Application state shared across HTTP handlers
///
/// Built once at startup from the resolved configuration; nothing reads
/// process-wide globals after that.
#[derive(Clone)]
pub struct AppState {
    /// Dual-backend response store
    pub store: Arc<Store>,
    /// Read/export credential; empty disables the admin endpoints
    pub admin_password: String,
    /// Second credential required for bulk deletion
    pub delete_password: String,
}

impl AppState {
    pub fn new(store: Store, admin_password: String, delete_password: String) -> Self {
        Self {
            store: Arc::new(store),
            admin_password,
            delete_password,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    Router::new()
        // Survey API
        .route("/api/submit", post(api::submit_survey))
        .route("/api/download-csv", get(api::download_csv))
        .route("/api/health", get(api::health_check))
        // Admin API (credential checked per handler)
        .route("/api/admin/responses", get(api::list_responses))
        .route("/api/admin/analytics", get(api::get_analytics))
        .route("/api/admin/download-csv", get(api::admin_download_csv))
        .route("/api/admin/delete-all", delete(api::delete_all))
        // Embedded UI
        .route("/", get(api::serve_index))
        .route("/admin", get(api::serve_admin))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/static/admin.js", get(api::serve_admin_js))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
