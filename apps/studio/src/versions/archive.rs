use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::models::cv::Document;
use crate::storage::{KvStore, StorageError, VERSIONS_KEY};

/// Number of saved versions kept; older ones are dropped on save.
pub const VERSION_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A named copy of the document. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSnapshot {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Document,
    pub date: DateTime<Utc>,
}

/// Listing entry without the document body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub id: String,
    pub label: Option<String>,
    pub full_name: String,
    pub date: DateTime<Utc>,
}

impl From<&VersionSnapshot> for VersionSummary {
    fn from(v: &VersionSnapshot) -> Self {
        Self {
            id: v.id.clone(),
            label: v.label.clone(),
            full_name: v.data.personal_details.full_name.clone(),
            date: v.date,
        }
    }
}

/// User-initiated snapshots, newest first, persisted under their own key and
/// independent of undo/redo.
///
/// The in-memory list only changes after the write that reflects it has
/// succeeded, so it always matches what a reload would return.
pub struct VersionArchive {
    kv: Arc<dyn KvStore>,
    versions: Mutex<Vec<VersionSnapshot>>,
}

impl VersionArchive {
    /// Loads the stored list. Missing or unreadable data yields an empty archive.
    pub async fn open(kv: Arc<dyn KvStore>) -> Self {
        let versions = match kv.get(VERSIONS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<VersionSnapshot>>(&raw) {
                Ok(mut versions) => {
                    versions.truncate(VERSION_LIMIT);
                    info!("Loaded {} saved versions", versions.len());
                    versions
                }
                Err(e) => {
                    warn!("Stored version list is corrupt, starting empty: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read version list, starting empty: {e}");
                Vec::new()
            }
        };
        Self {
            kv,
            versions: Mutex::new(versions),
        }
    }

    /// Snapshots `document`, prepends it and trims the list to [`VERSION_LIMIT`].
    pub async fn save(
        &self,
        document: &Document,
        label: Option<&str>,
    ) -> Result<VersionSnapshot, ArchiveError> {
        let mut versions = self.versions.lock().await;
        let now = Utc::now();
        let snapshot = VersionSnapshot {
            id: next_id(&versions, now),
            label: label
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            data: document.clone(),
            date: now,
        };

        let mut next = Vec::with_capacity(VERSION_LIMIT);
        next.push(snapshot.clone());
        next.extend(versions.iter().take(VERSION_LIMIT - 1).cloned());

        self.write(&next).await?;
        *versions = next;
        info!(
            "Saved version {} ({})",
            snapshot.id,
            snapshot.label.as_deref().unwrap_or("untitled")
        );
        Ok(snapshot)
    }

    /// Removes the version with `id`. Returns `false` without writing anything
    /// when no such version exists.
    pub async fn delete(&self, id: &str) -> Result<bool, ArchiveError> {
        let mut versions = self.versions.lock().await;
        if !versions.iter().any(|v| v.id == id) {
            return Ok(false);
        }
        let next: Vec<_> = versions.iter().filter(|v| v.id != id).cloned().collect();
        self.write(&next).await?;
        *versions = next;
        info!("Deleted version {id}");
        Ok(true)
    }

    #[cfg(test)]
    pub async fn list(&self) -> Vec<VersionSnapshot> {
        self.versions.lock().await.clone()
    }

    pub async fn summaries(&self) -> Vec<VersionSummary> {
        self.versions
            .lock()
            .await
            .iter()
            .map(VersionSummary::from)
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<VersionSnapshot> {
        self.versions
            .lock()
            .await
            .iter()
            .find(|v| v.id == id)
            .cloned()
    }

    /// Returns the stored document unchanged. Feeding it back into the editor is
    /// the caller's job (and is an ordinary commit there).
    pub async fn load(&self, id: &str) -> Option<Document> {
        self.get(id).await.map(|v| v.data)
    }

    /// Persists `versions`. An empty list removes the key altogether.
    async fn write(&self, versions: &[VersionSnapshot]) -> Result<(), ArchiveError> {
        let result = if versions.is_empty() {
            self.kv.remove(VERSIONS_KEY).await
        } else {
            let raw = serde_json::to_string(versions)?;
            self.kv.set(VERSIONS_KEY, &raw).await
        };
        result.map_err(|e| {
            warn!("Failed to persist version list: {e}");
            ArchiveError::from(e)
        })
    }
}

/// Millisecond timestamp, bumped past the newest existing id so ids stay unique
/// when saves land in the same millisecond.
fn next_id(existing: &[VersionSnapshot], now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis();
    let newest = existing
        .iter()
        .filter_map(|v| v.id.parse::<i64>().ok())
        .max();
    match newest {
        Some(n) if n >= millis => (n + 1).to_string(),
        _ => millis.to_string(),
    }
}
