//! Narrow interface to the fast progress cache.

use async_trait::async_trait;

use crate::error::CacheError;
use crate::job::JobStatus;
use crate::types::JobId;

/// Best-effort, low-latency mirror of a job's live progress fields.
///
/// Entries are keyed by job id and lazily created on first write or on
/// read-miss repopulation. An entry may be arbitrarily stale or absent at
/// any time; losing the whole cache is a latency problem, never a
/// correctness problem. `Ok(None)` from the read methods means "no cached
/// value" and callers fall back to the durable store.
#[async_trait]
pub trait ProgressCache: Send + Sync {
    /// Read the cached `progress` field, if any.
    async fn read_progress(&self, id: JobId) -> Result<Option<f64>, CacheError>;

    /// Read the cached `status` field, if any.
    async fn read_status(&self, id: JobId) -> Result<Option<JobStatus>, CacheError>;

    /// Mirror a processor snapshot: `progress` and `processed_lines`.
    async fn write_snapshot(
        &self,
        id: JobId,
        progress: f64,
        processed_lines: i64,
    ) -> Result<(), CacheError>;

    /// Repopulate only the `progress` field after a read miss.
    async fn write_progress(&self, id: JobId, progress: f64) -> Result<(), CacheError>;
}
