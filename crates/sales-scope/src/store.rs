//! Dataset storage.
//!
//! The dataset is read once and cached for the life of the process.
//! [`SalesStore::load`] never fails: a missing or corrupt dataset file is
//! logged and served as an empty snapshot, so every query degrades to "no
//! data" instead of an error page. [`SalesStore::reset`] drops the cache
//! and the next load re-reads the source.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sales_scope_core::Record;
use tokio::sync::RwLock;

/// Where records come from. The store does not care whether that is a file
/// on disk or an in-memory fixture.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Record>>;

    /// Human-readable origin, used in log lines.
    fn describe(&self) -> String;
}

/// Reads a JSON array of records from a file.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<Record>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read dataset file: {}", self.path.display()))?;
        let records: Vec<Record> = serde_json::from_str(&content).with_context(|| {
            format!("dataset is not a JSON record array: {}", self.path.display())
        })?;
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Cached dataset snapshot with single-flight loading.
pub struct SalesStore {
    source: Box<dyn RecordSource>,
    cache: RwLock<Option<Arc<[Record]>>>,
}

impl SalesStore {
    pub fn new(source: Box<dyn RecordSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(None),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(JsonFileSource::new(path)))
    }

    /// Return the cached snapshot, reading the source on first use.
    ///
    /// Concurrent first calls race to the write lock; whichever wins does
    /// the read and the rest reuse its snapshot, so the source is fetched
    /// at most once per cache generation. Fetch failures are absorbed into
    /// an empty snapshot and logged.
    pub async fn load(&self) -> Arc<[Record]> {
        if let Some(snapshot) = self.cache.read().await.as_ref() {
            return Arc::clone(snapshot);
        }

        let mut slot = self.cache.write().await;
        if let Some(snapshot) = slot.as_ref() {
            return Arc::clone(snapshot);
        }

        let records = match self.source.fetch().await {
            Ok(records) => {
                tracing::info!(
                    "loaded {} sales records from {}",
                    records.len(),
                    self.source.describe()
                );
                records
            }
            Err(err) => {
                tracing::warn!(
                    "sales dataset unavailable ({}): {:#}",
                    self.source.describe(),
                    err
                );
                Vec::new()
            }
        };
        let snapshot: Arc<[Record]> = records.into();
        *slot = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Drop the cached snapshot so the next [`SalesStore::load`] re-reads
    /// the source.
    pub async fn reset(&self) {
        *self.cache.write().await = None;
    }
}
