//! Segment listing

use axum::{extract::State, Json};
use labeler_common::Segment;
use serde::Serialize;
use tracing::debug;

use crate::{loader, AppState};

/// Response for GET /api/segments
#[derive(Debug, Serialize)]
pub struct SegmentsResponse {
    pub segments: Vec<Segment>,
}

/// GET /api/segments
///
/// Unlabeled segments with staged labels applied. Store failures yield an
/// empty list rather than an error.
pub async fn list_segments(State(state): State<AppState>) -> Json<SegmentsResponse> {
    let staged = state.staging.snapshot().await;
    let segments = loader::load_segments_or_empty(state.store.as_ref(), &staged).await;

    debug!(count = segments.len(), staged = staged.len(), "Listing segments");

    Json(SegmentsResponse { segments })
}
