//! Password-gated admin endpoints: response browsing, aggregate analytics,
//! and irreversible bulk deletion

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use csat_common::model::SurveyResponse;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::analytics::{analytics, AnalyticsReport};
use crate::api::auth::{require_admin, require_delete, AdminQuery, AuthError, DeleteQuery};
use crate::store::ListOrder;
use crate::AppState;

/// Response list payload
#[derive(Debug, Serialize)]
pub struct ResponsesPayload {
    pub total: usize,
    pub responses: Vec<SurveyResponse>,
}

/// GET /api/admin/responses?password=…
///
/// Returns every response, most recent first.
pub async fn list_responses(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<ResponsesPayload>, AdminError> {
    require_admin(&state, query.password.as_deref())?;

    let responses = state
        .store
        .list(ListOrder::NewestFirst)
        .await
        .map_err(|e| AdminError::Storage(e.to_string()))?;

    Ok(Json(ResponsesPayload {
        total: responses.len(),
        responses,
    }))
}

/// GET /api/admin/analytics?password=…
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<AnalyticsReport>, AdminError> {
    require_admin(&state, query.password.as_deref())?;

    let responses = state
        .store
        .list(ListOrder::Insertion)
        .await
        .map_err(|e| AdminError::Storage(e.to_string()))?;

    Ok(Json(analytics(&responses)))
}

/// DELETE /api/admin/delete-all?password=…&deletePassword=…
///
/// Irreversible. Requires both the admin credential and the distinct
/// delete credential; 401 if either is wrong.
pub async fn delete_all(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Response, AdminError> {
    require_delete(
        &state,
        query.password.as_deref(),
        query.delete_password.as_deref(),
    )?;

    let deleted = state.store.delete_all().await.map_err(|e| {
        warn!("Bulk delete failed: {}", e);
        AdminError::Storage(e.to_string())
    })?;

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "deleted": deleted })),
    )
        .into_response())
}

/// Admin endpoint errors
///
/// Storage failures on admin reads are surfaced raw for operator
/// debugging, never silently swallowed.
#[derive(Debug)]
pub enum AdminError {
    Auth(AuthError),
    Storage(String),
}

impl From<AuthError> for AdminError {
    fn from(e: AuthError) -> Self {
        AdminError::Auth(e)
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self {
            AdminError::Auth(e) => e.into_response(),
            AdminError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response(),
        }
    }
}
