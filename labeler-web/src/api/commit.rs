//! Commit of staged labels
//!
//! A commit takes every staged label, re-reads the unlabeled segments, writes
//! each staged label to the store, regenerates the spreadsheet from the
//! loaded segments and responds `{ok: true}`. Per-row store failures are
//! logged and skipped; the spreadsheet still shows the staged label for those
//! rows. Only an export failure fails the request, and then the taken labels
//! are staged again.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashSet;
use tracing::{error, info, warn};

use super::StatusResponse;
use crate::export::ExportError;
use crate::{loader, AppState};

/// Per-commit counters, logged when the commit finishes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    pub persisted: usize,
    pub failed: usize,
    /// Staged ids no longer in the unlabeled set
    pub discarded: usize,
    pub exported: usize,
}

/// POST /api/commit
pub async fn commit_labels(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, CommitError> {
    let _guard = state.commit_lock.lock().await;

    let staged = state.staging.take().await;
    let segments = loader::load_segments_or_empty(state.store.as_ref(), &staged).await;

    let mut summary = CommitSummary {
        exported: segments.len(),
        ..Default::default()
    };

    for segment in &segments {
        let Some(label) = staged.get(&segment.id) else {
            continue;
        };
        match state.store.update_label(segment.id, label).await {
            Ok(()) => summary.persisted += 1,
            Err(e) => {
                summary.failed += 1;
                error!(segment_id = segment.id, error = %e, "Failed to update segment label");
            }
        }
    }

    let loaded_ids: HashSet<i64> = segments.iter().map(|s| s.id).collect();
    summary.discarded = staged.keys().filter(|id| !loaded_ids.contains(id)).count();
    if summary.discarded > 0 {
        warn!(
            count = summary.discarded,
            "Dropped staged labels for segments that are no longer unlabeled"
        );
    }

    if let Err(e) = state.exporter.export(segments).await {
        error!(
            path = %state.exporter.path().display(),
            error = %e,
            "Failed to write segment export"
        );
        state.staging.restore(staged).await;
        return Err(CommitError::Export(e));
    }

    info!(
        persisted = summary.persisted,
        failed = summary.failed,
        discarded = summary.discarded,
        exported = summary.exported,
        "Commit complete"
    );

    Ok(Json(StatusResponse::ok()))
}

/// Commit errors
#[derive(Debug)]
pub enum CommitError {
    Export(ExportError),
}

impl IntoResponse for CommitError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            CommitError::Export(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Export failed: {}", e),
            ),
        };

        (status, Json(StatusResponse::error(message))).into_response()
    }
}
