//! In-process progress cache with the same semantics as the Redis
//! backend: per-job field maps, all values stored as strings.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use linemill_core::{CacheError, JobId, JobStatus, ProgressCache};

/// Hash-per-job cache held in a `RwLock`ed map.
#[derive(Default)]
pub struct MemoryProgressCache {
    entries: RwLock<HashMap<JobId, HashMap<String, String>>>,
}

impl MemoryProgressCache {
    pub fn new() -> Self {
        Self::default()
    }

    async fn field(&self, id: JobId, field: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries.get(&id).and_then(|fields| fields.get(field)).cloned()
    }

    async fn put(&self, id: JobId, fields: &[(&str, String)]) {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(id).or_default();
        for (name, value) in fields {
            entry.insert((*name).to_string(), value.clone());
        }
    }
}

#[async_trait]
impl ProgressCache for MemoryProgressCache {
    async fn read_progress(&self, id: JobId) -> Result<Option<f64>, CacheError> {
        Ok(self.field(id, "progress").await.and_then(|raw| raw.parse().ok()))
    }

    async fn read_status(&self, id: JobId) -> Result<Option<JobStatus>, CacheError> {
        Ok(self
            .field(id, "status")
            .await
            .as_deref()
            .and_then(JobStatus::parse))
    }

    async fn write_snapshot(
        &self,
        id: JobId,
        progress: f64,
        processed_lines: i64,
    ) -> Result<(), CacheError> {
        self.put(
            id,
            &[
                ("progress", progress.to_string()),
                ("processed_lines", processed_lines.to_string()),
            ],
        )
        .await;
        Ok(())
    }

    async fn write_progress(&self, id: JobId, progress: f64) -> Result<(), CacheError> {
        self.put(id, &[("progress", progress.to_string())]).await;
        Ok(())
    }
}
