//! Cache-coherent progress read path for the streaming loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use linemill_core::{
    retry_cache, retry_store, JobId, JobStatus, JobStore, ProgressCache, ProgressSnapshot,
    StoreError,
};

use crate::{CACHE_RETRY, STORE_RETRY};

/// Fixed pause between polls of the streaming loop.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Read path preferring the cache and falling back to the durable store.
///
/// A cache value can trail the store but never lead it (the processor
/// writes the store first), so fallbacks only ever make the view fresher.
pub struct ProgressReader {
    store: Arc<dyn JobStore>,
    cache: Arc<dyn ProgressCache>,
}

impl ProgressReader {
    pub fn new(store: Arc<dyn JobStore>, cache: Arc<dyn ProgressCache>) -> Self {
        Self { store, cache }
    }

    /// Current progress percentage: cache-first, store on miss (0 when
    /// the job is unknown), repopulating the cache best-effort.
    pub async fn progress(&self, job_id: JobId) -> Result<f64, StoreError> {
        let cached = retry_cache(&CACHE_RETRY, || self.cache.read_progress(job_id))
            .await
            .flatten();
        if let Some(progress) = cached {
            return Ok(progress);
        }

        let job = retry_store(&STORE_RETRY, || self.store.fetch(job_id)).await?;
        let progress = job.map(|job| job.progress).unwrap_or(0.0);

        // Repopulate so the next poll can hit the cache. Failure here is
        // ignored, not surfaced.
        let repopulated =
            retry_cache(&CACHE_RETRY, || self.cache.write_progress(job_id, progress)).await;
        if repopulated.is_none() {
            tracing::debug!(job_id = %job_id, "cache repopulation skipped");
        }

        Ok(progress)
    }

    /// Current status: cache-first, store on miss. A job that is absent
    /// or not yet terminal reads as `in_progress`.
    pub async fn status(&self, job_id: JobId) -> Result<JobStatus, StoreError> {
        let cached = retry_cache(&CACHE_RETRY, || self.cache.read_status(job_id))
            .await
            .flatten();
        if let Some(status) = cached {
            return Ok(status);
        }

        let job = retry_store(&STORE_RETRY, || self.store.fetch(job_id)).await?;
        Ok(job.map(|job| job.status).unwrap_or(JobStatus::InProgress))
    }

    /// Poll once per second, pushing a snapshot per iteration into `tx`,
    /// until the job reaches a terminal status or the receiver is dropped
    /// (client disconnect). Store errors propagate after their retry
    /// budget and end the stream.
    pub async fn stream(&self, job_id: JobId, tx: mpsc::Sender<ProgressSnapshot>) -> Result<(), StoreError> {
        loop {
            let progress = self.progress(job_id).await?;

            if tx.send(ProgressSnapshot { job_id, progress }).await.is_err() {
                tracing::debug!(job_id = %job_id, "progress stream receiver dropped");
                return Ok(());
            }

            let status = self.status(job_id).await?;
            if status.is_terminal() {
                tracing::debug!(job_id = %job_id, status = status.as_str(), "progress stream finished");
                return Ok(());
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
