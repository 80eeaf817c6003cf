//! Label staging

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use super::StatusResponse;
use crate::AppState;

/// Body of POST /api/pending
///
/// Absent fields default to `id = 0` (rejected) and an empty label.
#[derive(Debug, Deserialize)]
pub struct PendingRequest {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub label: String,
}

/// POST /api/pending
///
/// Stages `label` for segment `id`, replacing any earlier staged label. The
/// id is not checked against the store.
pub async fn stage_label(
    State(state): State<AppState>,
    payload: Result<Json<PendingRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, PendingError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected stage request body");
        PendingError::InvalidBody
    })?;

    if request.id <= 0 {
        debug!(segment_id = request.id, "Rejected stage request with invalid id");
        return Err(PendingError::InvalidSegmentId);
    }

    let previous = state.staging.stage(request.id, request.label.clone()).await;
    info!(
        segment_id = request.id,
        label = %request.label,
        replaced = previous.is_some(),
        "Staged label"
    );

    Ok(Json(StatusResponse::ok()))
}

/// Stage request errors
#[derive(Debug)]
pub enum PendingError {
    InvalidSegmentId,
    InvalidBody,
}

impl IntoResponse for PendingError {
    fn into_response(self) -> Response {
        let message = match self {
            PendingError::InvalidSegmentId => "invalid segment_id",
            PendingError::InvalidBody => "invalid request body",
        };

        (StatusCode::BAD_REQUEST, Json(StatusResponse::error(message))).into_response()
    }
}
