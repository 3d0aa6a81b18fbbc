//! Status query handler: GET /status/{session_id}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::error::ApiResult;
use crate::models::is_valid_session_id;
use crate::AppState;

/// GET /status/{session_id}
///
/// Returns the persisted status document verbatim, or a `not_found`
/// indicator when no document exists. Syntactically invalid ids can never
/// have a document, so they report `not_found` too.
pub async fn get_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Response> {
    if !is_valid_session_id(&session_id) {
        return Ok(not_found_response());
    }

    match state.store.read(&session_id)? {
        Some(doc) => {
            tracing::debug!(session_id = %session_id, status = %doc.status, "Status query");
            Ok(Json(doc).into_response())
        }
        None => Ok(not_found_response()),
    }
}

fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "not_found",
            "error": "Session not found",
        })),
    )
        .into_response()
}

/// Build status routes
pub fn status_routes() -> Router<AppState> {
    Router::new().route("/status/:session_id", get(get_status))
}
