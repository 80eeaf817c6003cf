//! Remote segment store access
//!
//! The labeler only needs two things from the hosted table: a filtered read of
//! unlabeled rows and a per-row label update. Both sit behind
//! [`SegmentStore`] so handlers can be driven by an in-memory store in tests.

use async_trait::async_trait;
use labeler_common::SegmentRow;
use thiserror::Error;

pub mod postgrest;

pub use postgrest::PostgrestStore;

/// Remote store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Store API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Table of segment rows
#[async_trait]
pub trait SegmentStore: Send + Sync {
    /// Rows whose label is null or empty, in store order
    async fn fetch_unlabeled(&self) -> Result<Vec<SegmentRow>, StoreError>;

    /// Set the label column of the row with `id`
    async fn update_label(&self, id: i64, label: &str) -> Result<(), StoreError>;
}
