//! PostgREST client for the hosted segment table
//!
//! Talks to the REST endpoint a Supabase project exposes at
//! `{store_url}/rest/v1/{table}`, authenticating with the project key as both
//! `apikey` and bearer token.

use async_trait::async_trait;
use labeler_common::config::LabelerConfig;
use labeler_common::SegmentRow;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{SegmentStore, StoreError};

const USER_AGENT: &str = concat!("labeler-web/", env!("CARGO_PKG_VERSION"));

/// Null-or-empty label filter in PostgREST syntax
const UNLABELED_FILTER: &str = "(label.is.null,label.eq.)";

/// Hosted segment table client
pub struct PostgrestStore {
    http_client: reqwest::Client,
    table_url: String,
    key: String,
}

impl PostgrestStore {
    pub fn new(
        base_url: &str,
        key: &str,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            table_url: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            key: key.to_string(),
        })
    }

    pub fn from_config(config: &LabelerConfig) -> Result<Self, StoreError> {
        Self::new(
            &config.store_url,
            &config.store_key,
            &config.table,
            config.http_timeout,
        )
    }

    /// Endpoint for the segment table
    pub fn table_url(&self) -> &str {
        &self.table_url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("apikey", &self.key).bearer_auth(&self.key)
    }
}

/// Turn a non-2xx response into `StoreError::Api`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SegmentStore for PostgrestStore {
    async fn fetch_unlabeled(&self) -> Result<Vec<SegmentRow>, StoreError> {
        debug!(url = %self.table_url, "Fetching unlabeled segments");

        let response = self
            .authorized(self.http_client.get(&self.table_url))
            .query(&[
                ("select", "*"),
                ("or", UNLABELED_FILTER),
                ("order", "id.asc"),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let rows: Vec<SegmentRow> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        debug!(count = rows.len(), "Fetched unlabeled segments");
        Ok(rows)
    }

    async fn update_label(&self, id: i64, label: &str) -> Result<(), StoreError> {
        debug!(segment_id = id, label = %label, "Updating segment label");

        let response = self
            .authorized(self.http_client.patch(&self.table_url))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&json!({ "label": label }))
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }
}
