//! Submission handler: POST /convert

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::models::is_valid_session_id;
use crate::services::pipeline;
use crate::AppState;

/// POST /convert request
///
/// Fields default to empty so missing keys surface as a 400 validation
/// error rather than a body-deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub youtube_url: String,
    #[serde(default)]
    pub session_id: String,
}

/// POST /convert response (202 Accepted)
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub session_id: String,
    pub message: String,
}

/// POST /convert
///
/// Validates the submission, spawns the background job, and returns
/// immediately. Job outcome is never reported here; clients poll
/// `/status/{session_id}`.
pub async fn convert(
    State(state): State<AppState>,
    Json(request): Json<ConvertRequest>,
) -> ApiResult<(StatusCode, Json<ConvertResponse>)> {
    if request.youtube_url.is_empty() || request.session_id.is_empty() {
        return Err(ApiError::BadRequest(
            "YouTube URL and session ID are required".to_string(),
        ));
    }
    if !is_valid_session_id(&request.session_id) {
        return Err(ApiError::BadRequest(
            "Session ID may only contain alphanumerics, '.', '_' and '-'".to_string(),
        ));
    }

    tracing::info!(
        session_id = %request.session_id,
        url = %request.youtube_url,
        "Conversion submitted"
    );

    pipeline::spawn_conversion(&state, request.youtube_url, request.session_id.clone()).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(ConvertResponse {
            session_id: request.session_id,
            message: "Processing started".to_string(),
        }),
    ))
}

/// Build submission routes
pub fn convert_routes() -> Router<AppState> {
    Router::new().route("/convert", post(convert))
}
