//! Admin credential checks
//!
//! The admin endpoints are gated by a static shared secret compared by
//! exact string match; bulk deletion requires a second, distinct
//! credential. A service configured without an admin password rejects all
//! admin requests rather than allowing open access.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::AppState;

/// Query parameters carrying the admin credential
#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub password: Option<String>,
}

/// Query parameters for bulk deletion: both credentials required
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub password: Option<String>,
    #[serde(rename = "deletePassword")]
    pub delete_password: Option<String>,
}

/// Check the read/export credential
pub fn require_admin(state: &AppState, password: Option<&str>) -> Result<(), AuthError> {
    if state.admin_password.is_empty() {
        warn!("Admin request rejected: no admin password configured");
        return Err(AuthError::AdminDisabled);
    }
    match password {
        Some(p) if p == state.admin_password => Ok(()),
        Some(_) => Err(AuthError::InvalidCredential),
        None => Err(AuthError::MissingCredential),
    }
}

/// Check both the admin credential and the delete credential
pub fn require_delete(
    state: &AppState,
    password: Option<&str>,
    delete_password: Option<&str>,
) -> Result<(), AuthError> {
    require_admin(state, password)?;
    if state.delete_password.is_empty() {
        warn!("Delete request rejected: no delete password configured");
        return Err(AuthError::AdminDisabled);
    }
    match delete_password {
        Some(p) if p == state.delete_password => Ok(()),
        Some(_) => Err(AuthError::InvalidCredential),
        None => Err(AuthError::MissingCredential),
    }
}

/// Authentication errors; all map to 401
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingCredential,
    InvalidCredential,
    AdminDisabled,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingCredential => "Missing password",
            AuthError::InvalidCredential => "Invalid password",
            AuthError::AdminDisabled => "Admin access is not configured",
        };

        let body = Json(json!({
            "error": message,
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
