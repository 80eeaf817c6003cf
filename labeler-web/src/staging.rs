//! In-memory staging of proposed labels
//!
//! Staged labels live only in this process and are lost on restart. A staged
//! entry always overrides the stored label when segments are presented, and a
//! later stage for the same id replaces the earlier one.

use std::collections::HashMap;
use tokio::sync::RwLock;

/// Proposed labels keyed by segment id
pub type StagedLabels = HashMap<i64, String>;

/// Process-wide staging map
#[derive(Debug, Default)]
pub struct StagingMap {
    entries: RwLock<StagedLabels>,
}

impl StagingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the staged label for `id`
    ///
    /// Returns the label it replaced, if any.
    pub async fn stage(&self, id: i64, label: String) -> Option<String> {
        self.entries.write().await.insert(id, label)
    }

    pub async fn get(&self, id: i64) -> Option<String> {
        self.entries.read().await.get(&id).cloned()
    }

    /// Copy of all staged labels
    pub async fn snapshot(&self) -> StagedLabels {
        self.entries.read().await.clone()
    }

    /// Remove and return every staged label
    pub async fn take(&self) -> StagedLabels {
        std::mem::take(&mut *self.entries.write().await)
    }

    /// Put previously taken labels back
    ///
    /// Ids staged again since the take keep their newer label.
    pub async fn restore(&self, taken: StagedLabels) {
        let mut entries = self.entries.write().await;
        for (id, label) in taken {
            entries.entry(id).or_insert(label);
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
