//! Artifact download handler: GET /download/{session_id}/{stem_type}

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::error::{ApiError, ApiResult};
use crate::models::{is_valid_session_id, SessionStatus, StemKind};
use crate::AppState;

/// GET /download/{session_id}/{stem_type}
///
/// Readiness is checked against the status document, never against the
/// filesystem: artifacts left behind by a half-failed job are not served.
pub async fn download_stem(
    State(state): State<AppState>,
    Path((session_id, stem_type)): Path<(String, String)>,
) -> ApiResult<Response> {
    let stem: StemKind = stem_type
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Unknown stem type: {}", stem_type)))?;

    if !is_valid_session_id(&session_id) {
        return Err(ApiError::NotFound("Session not found".to_string()));
    }

    let doc = state
        .store
        .read(&session_id)?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    if doc.status != SessionStatus::Ready {
        return Err(ApiError::BadRequest("Stems not ready yet".to_string()));
    }

    let path = state.store.layout().artifact(&session_id, stem);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound("Stem file not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!(
        session_id = %session_id,
        stem = %stem,
        bytes = bytes.len(),
        "Serving stem artifact"
    );

    let headers = [
        (header::CONTENT_TYPE, "audio/mpeg".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", stem.mp3_name()),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// Build download routes
pub fn download_routes() -> Router<AppState> {
    Router::new().route("/download/:session_id/:stem_type", get(download_stem))
}
