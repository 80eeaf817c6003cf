//! labeler-web library - segment labeling service
//!
//! Serves the labeling UI and a small JSON API for listing unlabeled
//! segments, staging labels in memory and committing them to the remote
//! segment store.

use axum::Router;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cli;
pub mod export;
pub mod loader;
pub mod staging;
pub mod store;

use export::XlsxExporter;
use staging::StagingMap;
use store::SegmentStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Remote segment table
    pub store: Arc<dyn SegmentStore>,
    /// Labels staged but not yet committed
    pub staging: Arc<StagingMap>,
    /// Spreadsheet regenerated on commit
    pub exporter: Arc<XlsxExporter>,
    /// Serializes commits
    commit_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Create new application state with an empty staging map
    pub fn new(store: Arc<dyn SegmentStore>, exporter: XlsxExporter) -> Self {
        Self {
            store,
            staging: Arc::new(StagingMap::new()),
            exporter: Arc::new(exporter),
            commit_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::serve_index))
        .route("/api/segments", get(api::list_segments))
        .route("/api/pending", post(api::stage_label))
        .route("/api/commit", post(api::commit_labels))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
