//! Shared helpers for labeler-web integration tests
//!
//! `MemoryStore` stands in for the hosted segment table and can be told to
//! fail reads or individual updates, or to park the next read until the test
//! releases it.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use calamine::{open_workbook, Reader, Xlsx};
use labeler_common::SegmentRow;
use labeler_web::export::{XlsxExporter, SHEET_NAME};
use labeler_web::store::{SegmentStore, StoreError};
use labeler_web::{build_router, AppState};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tower::util::ServiceExt; // for `oneshot` method

/// In-memory segment table
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<SegmentRow>>,
    failing_updates: Mutex<HashSet<i64>>,
    fail_reads: AtomicBool,
    updates: Mutex<Vec<(i64, String)>>,
    /// Every store call, in order: "fetch" or "update <id>"
    calls: Mutex<Vec<String>>,
    fetches: AtomicUsize,
    hold_next_fetch: AtomicBool,
    fetch_held: Notify,
    fetch_released: Notify,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<SegmentRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    /// Make every update of `id` fail
    pub fn fail_update_for(&self, id: i64) {
        self.failing_updates.lock().unwrap().insert(id);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Stored label of `id`; `None` when the row does not exist
    pub fn label_of(&self, id: i64) -> Option<Option<String>> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.label.clone())
    }

    /// Successful updates, in call order
    pub fn updates(&self) -> Vec<(i64, String)> {
        self.updates.lock().unwrap().clone()
    }

    /// Store calls in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Park the next `fetch_unlabeled` until [`MemoryStore::release_fetch`]
    pub fn hold_next_fetch(&self) {
        self.hold_next_fetch.store(true, Ordering::SeqCst);
    }

    /// Wait until a held fetch has started
    pub async fn wait_for_held_fetch(&self) {
        self.fetch_held.notified().await;
    }

    pub fn release_fetch(&self) {
        self.fetch_released.notify_one();
    }
}

#[async_trait]
impl SegmentStore for MemoryStore {
    async fn fetch_unlabeled(&self) -> Result<Vec<SegmentRow>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push("fetch".to_string());

        if self.hold_next_fetch.swap(false, Ordering::SeqCst) {
            self.fetch_held.notify_one();
            self.fetch_released.notified().await;
        }

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Network("simulated outage".to_string()));
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.is_unlabeled())
            .cloned()
            .collect())
    }

    async fn update_label(&self, id: i64, label: &str) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(format!("update {}", id));

        if self.failing_updates.lock().unwrap().contains(&id) {
            return Err(StoreError::Api {
                status: 500,
                body: "simulated update failure".to_string(),
            });
        }
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
            row.label = Some(label.to_string());
        }
        self.updates.lock().unwrap().push((id, label.to_string()));
        Ok(())
    }
}

pub fn row(id: i64, label: Option<&str>) -> SegmentRow {
    SegmentRow {
        id,
        segment_name: format!("seg{}", id),
        url: format!("http://x/{}.png", id),
        label: label.map(str::to_string),
    }
}

/// Router, state and store wired together, exporting into a temp dir
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub export_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub fn new(rows: Vec<SegmentRow>) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let export_path = dir.path().join("segments.xlsx");
        Self::with_export_path(rows, dir, export_path)
    }

    /// Export path that cannot be written (it is a directory)
    pub fn with_broken_export(rows: Vec<SegmentRow>) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let export_path = dir.path().to_path_buf();
        Self::with_export_path(rows, dir, export_path)
    }

    fn with_export_path(rows: Vec<SegmentRow>, dir: TempDir, export_path: PathBuf) -> Self {
        let store = Arc::new(MemoryStore::with_rows(rows));
        let state = AppState::new(store.clone(), XlsxExporter::new(&export_path));
        let router = build_router(state.clone());
        Self {
            router,
            state,
            store,
            export_path,
            _dir: dir,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn stage(&self, id: i64, label: &str) -> (StatusCode, Value) {
        self.post_json("/api/pending", serde_json::json!({ "id": id, "label": label }))
            .await
    }

    pub async fn segments(&self) -> Vec<Value> {
        let (status, body) = self.get("/api/segments").await;
        assert_eq!(status, StatusCode::OK);
        body["segments"].as_array().expect("segments array").clone()
    }

    /// GET returning the raw body text
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Should read body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// POST /api/commit on its own task, so the test can act while it runs
    pub fn spawn_commit(&self) -> JoinHandle<(StatusCode, Value)> {
        let router = self.router.clone();
        tokio::spawn(async move {
            let request = Request::builder()
                .method("POST")
                .uri("/api/commit")
                .body(Body::empty())
                .unwrap();
            send_request(router, request).await
        })
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send_request(self.router.clone(), request).await
    }
}

/// Send a request through the router and decode the JSON body
async fn send_request(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// All rows of the exported `results` sheet, header included
pub fn read_export(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("Should open export");
    let range = workbook
        .worksheet_range(SHEET_NAME)
        .expect("Should have results sheet");
    range
        .rows()
        .map(|cells| cells.iter().map(|cell| cell.to_string()).collect())
        .collect()
}
