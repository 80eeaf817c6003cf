//! HTTP API handlers for labeler-web

use serde::Serialize;

pub mod commit;
pub mod health;
pub mod pending;
pub mod segments;
pub mod ui;

pub use commit::commit_labels;
pub use health::health_routes;
pub use pending::stage_label;
pub use segments::list_segments;
pub use ui::serve_index;

/// `{ok, error?}` body returned by the write endpoints
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { ok: true, error: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}
