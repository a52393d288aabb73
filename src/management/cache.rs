use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{types::TrackRecord, warning};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable at {path}: {reason}")]
    Unavailable { path: String, reason: String },

    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable track-id -> record store backed by a single JSON object file.
///
/// The whole file is read once on open and rewritten in full on every `put`.
/// An absent or unreadable file starts an empty store. Writes go through a
/// temp file and a rename, under the same lock that guards the in-memory map,
/// so concurrent analyses never observe a half-written store.
pub struct TrackCache {
    path: Option<PathBuf>,
    records: Mutex<BTreeMap<String, TrackRecord>>,
}

impl TrackCache {
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match Self::read_store(&path).await {
            Ok(records) => records,
            Err(e) => {
                warning!("{}. Starting with an empty track cache.", e);
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path),
            records: Mutex::new(records),
        }
    }

    /// A cache that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("sonalyze/cache/song_db.json");
        path
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn get(&self, track_id: &str) -> Option<TrackRecord> {
        self.records.lock().await.get(track_id).cloned()
    }

    /// Stores `record` under `track_id`, replacing any previous entry.
    ///
    /// A failed write is logged; the record stays available in memory for the
    /// rest of the process.
    pub async fn put(&self, track_id: &str, record: TrackRecord) {
        let mut records = self.records.lock().await;
        records.insert(track_id.to_string(), record);

        if let Some(path) = &self.path {
            if let Err(e) = Self::write_store(path, &records).await {
                warning!("Cannot persist track cache to {}: {}", path.display(), e);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    pub async fn ids(&self) -> Vec<String> {
        self.records.lock().await.keys().cloned().collect()
    }

    async fn read_store(path: &Path) -> Result<BTreeMap<String, TrackRecord>, CacheError> {
        let content = match async_fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(CacheError::Unavailable {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let raw: Map<String, Value> =
            serde_json::from_str(&content).map_err(|e| CacheError::Unavailable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut records = BTreeMap::new();
        for (id, value) in raw {
            match serde_json::from_value::<TrackRecord>(value) {
                Ok(record) => {
                    records.insert(id, record);
                }
                Err(e) => warning!("Skipping malformed cache entry {}: {}", id, e),
            }
        }

        Ok(records)
    }

    async fn write_store(
        path: &Path,
        records: &BTreeMap<String, TrackRecord>,
    ) -> Result<(), CacheError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(records)?;
        let tmp = path.with_extension("json.tmp");
        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, path).await?;
        Ok(())
    }
}
