//! Survey submission endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use csat_common::model::{FieldError, RatingField, SubmitRequest};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::AppState;

/// POST /api/submit
///
/// Validates the eleven-field record and writes it to both backends. 201
/// on acceptance; 400 with a structured field-error list on validation
/// failure (every offending field, not just the first); 500 only when both
/// storage backends failed.
///
/// The body is decoded field by field rather than through a strict serde
/// extraction so that a wrong-typed value (a rating sent as `"5"`) reports
/// the offending field in the same 400 shape as a missing or out-of-range
/// one, instead of surfacing as an extractor rejection.
pub async fn submit_survey(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, SubmitError> {
    let Json(value) = payload.map_err(|rejection| {
        SubmitError::Validation(vec![FieldError::new("body", rejection.body_text())])
    })?;

    let request = decode_payload(&value).map_err(SubmitError::Validation)?;
    let new = request.validate().map_err(SubmitError::Validation)?;

    let outcome = state.store.create(&new).await.map_err(|e| {
        error!("Submission failed: {}", e);
        SubmitError::Storage(e.to_string())
    })?;

    info!(
        "Recorded survey response id={} (table={}, csv={})",
        outcome.response.id, outcome.db_committed, outcome.csv_committed
    );

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))).into_response())
}

/// Lenient per-field decode of the submission body
///
/// A field of the wrong JSON type is reported by name; an absent or null
/// field is left unset so `SubmitRequest::validate` can report it as
/// missing.
fn decode_payload(value: &Value) -> Result<SubmitRequest, Vec<FieldError>> {
    let Some(map) = value.as_object() else {
        return Err(vec![FieldError::new("body", "Expected a JSON object")]);
    };

    let mut errors = Vec::new();
    let mut request = SubmitRequest::default();

    for (field, slot) in [
        ("name", &mut request.name),
        ("company", &mut request.company),
    ] {
        match map.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => *slot = s.clone(),
            Some(_) => errors.push(FieldError::new(field, "Must be text")),
        }
    }

    match map.get("suggestions") {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => request.suggestions = Some(s.clone()),
        Some(_) => errors.push(FieldError::new("suggestions", "Must be text")),
    }

    for field in RatingField::ALL {
        match map.get(field.json_name()) {
            None | Some(Value::Null) => {}
            Some(v) => match v.as_i64() {
                Some(n) => request.set_rating(field, n),
                None => errors.push(FieldError::new(
                    field.json_name(),
                    "Rating must be a whole number",
                )),
            },
        }
    }

    if errors.is_empty() {
        Ok(request)
    } else {
        Err(errors)
    }
}

/// Submission endpoint errors
#[derive(Debug)]
pub enum SubmitError {
    Validation(Vec<FieldError>),
    Storage(String),
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        match self {
            SubmitError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Invalid data",
                    "errors": errors,
                })),
            )
                .into_response(),
            SubmitError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Internal server error",
                })),
            )
                .into_response(),
        }
    }
}
