//! Segment loading with staged overrides
//!
//! Reads the unlabeled rows from the store and applies staged labels on top.
//! Two entry points make the failure policy explicit at each call site:
//! [`load_segments`] propagates store errors, [`load_segments_or_empty`]
//! logs them and degrades to an empty list.

use labeler_common::Segment;
use tracing::{error, warn};

use crate::staging::StagedLabels;
use crate::store::{SegmentStore, StoreError};

/// Unlabeled segments in store order, with staged labels applied
///
/// Rows the store returns with a non-empty label are dropped.
pub async fn load_segments(
    store: &dyn SegmentStore,
    staged: &StagedLabels,
) -> Result<Vec<Segment>, StoreError> {
    let rows = store.fetch_unlabeled().await?;

    let segments = rows
        .into_iter()
        .filter(|row| {
            if row.is_unlabeled() {
                true
            } else {
                warn!(segment_id = row.id, "Store returned an already labeled segment; skipping");
                false
            }
        })
        .map(|row| {
            let staged_label = staged.get(&row.id).map(String::as_str);
            Segment::from_row(row, staged_label)
        })
        .collect();

    Ok(segments)
}

/// Like [`load_segments`], but a store failure yields no segments
pub async fn load_segments_or_empty(
    store: &dyn SegmentStore,
    staged: &StagedLabels,
) -> Vec<Segment> {
    match load_segments(store, staged).await {
        Ok(segments) => segments,
        Err(e) => {
            error!(error = %e, "Failed to load segments from store");
            Vec::new()
        }
    }
}
