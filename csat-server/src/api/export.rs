//! CSV export endpoints
//!
//! Both the public and the admin download regenerate the full document from
//! the authoritative table, falling back to the on-disk snapshot only if
//! the table is unreachable.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use csat_common::Error;
use serde_json::json;

use crate::api::auth::{require_admin, AdminQuery, AuthError};
use crate::AppState;

/// GET /api/download-csv
pub async fn download_csv(State(state): State<AppState>) -> Result<Response, ExportError> {
    csv_response(&state).await
}

/// GET /api/admin/download-csv?password=…
pub async fn admin_download_csv(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Response, ExportError> {
    require_admin(&state, query.password.as_deref())?;
    csv_response(&state).await
}

async fn csv_response(state: &AppState) -> Result<Response, ExportError> {
    let document = state.store.export_csv().await.map_err(|e| match e {
        Error::NotFound(msg) => ExportError::NotFound(msg),
        other => ExportError::Storage(other.to_string()),
    })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"survey_responses.csv\"",
            ),
        ],
        document,
    )
        .into_response())
}

/// Export endpoint errors
#[derive(Debug)]
pub enum ExportError {
    Auth(AuthError),
    NotFound(String),
    Storage(String),
}

impl From<AuthError> for ExportError {
    fn from(e: AuthError) -> Self {
        ExportError::Auth(e)
    }
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        match self {
            ExportError::Auth(e) => e.into_response(),
            ExportError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": msg })),
            )
                .into_response(),
            ExportError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response(),
        }
    }
}
