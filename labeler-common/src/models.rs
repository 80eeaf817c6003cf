//! Segment models
//!
//! `SegmentRow` is the shape of a row in the remote `segment_images` table.
//! `Segment` is what the labeler presents to the UI and exports: the stored
//! label with any staged override already applied.

use serde::{Deserialize, Serialize};

/// Row as returned by the remote segment store
///
/// `segment_name` and `url` decode as empty strings when absent; `label` is
/// `None` when the column is null.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SegmentRow {
    pub id: i64,
    #[serde(default)]
    pub segment_name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl SegmentRow {
    /// A row is unlabeled when its label is null or the empty string
    pub fn is_unlabeled(&self) -> bool {
        self.label.as_deref().map_or(true, str::is_empty)
    }
}

/// Segment as presented to the UI
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Segment {
    pub id: i64,
    pub segment_name: String,
    pub url: String,
    pub label: String,
}

impl Segment {
    /// Build a presented segment from a store row, preferring `staged` over
    /// whatever the store holds
    pub fn from_row(row: SegmentRow, staged: Option<&str>) -> Self {
        let label = match staged {
            Some(label) => label.to_string(),
            None => row.label.unwrap_or_default(),
        };
        Self {
            id: row.id,
            segment_name: row.segment_name,
            url: row.url,
            label,
        }
    }
}
