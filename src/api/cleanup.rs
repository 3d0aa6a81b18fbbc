//! Explicit cleanup handler: DELETE /cleanup/{session_id}

use axum::{
    extract::{Path, State},
    routing::delete,
    Json, Router,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::models::is_valid_session_id;
use crate::AppState;

/// DELETE /cleanup/{session_id} response
#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub message: String,
}

/// DELETE /cleanup/{session_id}
///
/// Removes everything associated with the session unconditionally,
/// regardless of status. Cleaning up a session that never existed still
/// succeeds.
pub async fn cleanup_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<CleanupResponse>> {
    if !is_valid_session_id(&session_id) {
        return Err(ApiError::BadRequest(
            "Session ID may only contain alphanumerics, '.', '_' and '-'".to_string(),
        ));
    }

    state.store.purge(&session_id)?;
    tracing::info!(session_id = %session_id, "Session cleaned up");

    Ok(Json(CleanupResponse {
        message: "Cleanup successful".to_string(),
    }))
}

/// Build cleanup routes
pub fn cleanup_routes() -> Router<AppState> {
    Router::new().route("/cleanup/:session_id", delete(cleanup_session))
}
