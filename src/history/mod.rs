//! Bounded, most-recent-first list of past extractions.
//!
//! The list lives behind a [`HistoryStorage`] holding one serialized value.
//! Every mutation rewrites that value in full.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::core::{Extraction, null_as_default};
use crate::error::{Result, VidgrabError};
use crate::platform::detect;

pub mod storage;

pub use storage::{FileStorage, HistoryStorage, MemoryStorage};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl HistoryEntry {
    /// Record a successful extraction of `url`, stamped with the current time
    pub fn from_extraction(url: &str, extraction: &Extraction) -> Self {
        let result = &extraction.result;
        let platform = if result.platform.is_empty() || result.platform == "Unknown" {
            detect(url).to_string()
        } else {
            result.platform.clone()
        };

        Self {
            id: Uuid::now_v7().to_string(),
            url: url.to_string(),
            title: result.title.clone(),
            platform,
            timestamp: chrono::Utc::now().timestamp_millis(),
            thumbnail: result.thumbnail.clone().unwrap_or_default(),
            method: Some(extraction.method.clone()),
        }
    }
}

pub fn parse_entries(raw: &str) -> Result<Vec<HistoryEntry>> {
    serde_json::from_str(raw).map_err(|e| VidgrabError::HistoryParse(e.to_string()))
}

pub fn serialize_entries(entries: &[HistoryEntry]) -> Result<String> {
    Ok(serde_json::to_string(entries)?)
}

pub struct HistoryStore<S> {
    storage: S,
    entries: Vec<HistoryEntry>,
    limit: usize,
}

impl<S: HistoryStorage> HistoryStore<S> {
    /// Load the persisted list.
    ///
    /// Unreadable or corrupt state yields an empty history.
    pub fn load(storage: S, limit: usize) -> Self {
        let limit = limit.max(1);
        let mut entries = match storage.read() {
            Ok(Some(raw)) => parse_entries(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding stored history");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read stored history");
                Vec::new()
            }
        };
        entries.truncate(limit);

        Self {
            storage,
            entries,
            limit,
        }
    }

    /// Most recent first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Prepend `entry`, drop the oldest beyond the limit, and persist the list
    pub fn append(&mut self, entry: HistoryEntry) -> Result<()> {
        self.entries.insert(0, entry);
        self.entries.truncate(self.limit);
        let raw = serialize_entries(&self.entries)?;
        self.storage.write(&raw)?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.storage.remove()?;
        Ok(())
    }
}
