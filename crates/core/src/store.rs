//! Narrow interface to the durable job store.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::job::JobRecord;
use crate::types::JobId;

/// Authoritative persisted record per job.
///
/// The store exclusively owns the canonical job; everything else (the fast
/// cache in particular) is a regenerable projection. Implementations must
/// provide a true atomic increment for `processed_lines`; a
/// read-modify-write cycle loses updates under parallel workers.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a fresh job in `pending` status with zeroed counters.
    async fn create_job(&self, id: JobId, file_name: &str) -> Result<(), StoreError>;

    /// Upsert dispatch-time counters: set `total_lines`, reset
    /// `processed_lines` and `progress` to zero.
    ///
    /// Upsert semantics mean a re-dispatch of the same id silently resets
    /// counters even while older units are still in flight.
    async fn init_counters(&self, id: JobId, total_lines: i64) -> Result<(), StoreError>;

    /// Atomically add one to `processed_lines` and return the new value,
    /// or `None` when no such job exists.
    async fn increment_processed(&self, id: JobId) -> Result<Option<i64>, StoreError>;

    /// Persist a recomputed `progress` percentage.
    async fn set_progress(&self, id: JobId, progress: f64) -> Result<(), StoreError>;

    /// Transition the job to the terminal `completed` status.
    async fn mark_completed(&self, id: JobId) -> Result<(), StoreError>;

    /// Transition the job to the terminal `error` status with a message.
    async fn mark_error(&self, id: JobId, message: &str) -> Result<(), StoreError>;

    /// Fetch the full record, or `None` when no such job exists.
    async fn fetch(&self, id: JobId) -> Result<Option<JobRecord>, StoreError>;
}
