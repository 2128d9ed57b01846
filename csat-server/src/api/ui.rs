//! UI serving routes
//!
//! Serves the static HTML/JS survey wizard and admin page

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/app.js");
const ADMIN_HTML: &str = include_str!("../ui/admin.html");
const ADMIN_JS: &str = include_str!("../ui/admin.js");

/// GET /
///
/// Serves the survey wizard page
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /admin
///
/// Serves the admin dashboard page (the API behind it is password-gated)
pub async fn serve_admin() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// GET /static/admin.js
pub async fn serve_admin_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        ADMIN_JS,
    )
        .into_response()
}
