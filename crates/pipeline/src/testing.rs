//! In-memory collaborator doubles for pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use linemill_core::{
    CacheError, JobId, JobRecord, JobStatus, JobStore, ProgressCache, StoreError,
};

/// One durable `progress` write, with the counter value at write time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressWrite {
    pub processed_lines: i64,
    pub progress: f64,
}

/// In-memory `JobStore` that records every snapshot write and counts
/// full-record fetches, so tests can assert on the batching policy and
/// the cache-first read path.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<HashMap<JobId, JobRecord>>,
    progress_writes: Mutex<Vec<ProgressWrite>>,
    fetches: AtomicUsize,
    seeded_job: Option<JobId>,
}

impl MemoryJobStore {
    /// A store holding one freshly created (pending, zero-counter) job.
    pub fn with_job(file_name: &str) -> Self {
        let id = uuid::Uuid::new_v4();
        let store = Self {
            seeded_job: Some(id),
            ..Self::default()
        };
        store.jobs.lock().unwrap().insert(
            id,
            JobRecord {
                id,
                file_name: file_name.to_string(),
                status: JobStatus::Pending,
                total_lines: 0,
                processed_lines: 0,
                progress: 0.0,
                error_message: None,
            },
        );
        store
    }

    /// A store holding one job with dispatch-time counters initialized.
    pub fn with_dispatched_job(file_name: &str, total_lines: i64) -> Self {
        let store = Self::with_job(file_name);
        let id = store.only_job_id();
        store.jobs.lock().unwrap().get_mut(&id).unwrap().total_lines = total_lines;
        store
    }

    /// Id of the single seeded job.
    pub fn only_job_id(&self) -> JobId {
        self.seeded_job.expect("store was not seeded with a job")
    }

    /// Every durable `progress` write so far, in order.
    pub fn progress_writes(&self) -> Vec<ProgressWrite> {
        self.progress_writes.lock().unwrap().clone()
    }

    /// Number of full-record fetches served.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create_job(&self, id: JobId, file_name: &str) -> Result<(), StoreError> {
        self.jobs.lock().unwrap().insert(
            id,
            JobRecord {
                id,
                file_name: file_name.to_string(),
                status: JobStatus::Pending,
                total_lines: 0,
                processed_lines: 0,
                progress: 0.0,
                error_message: None,
            },
        );
        Ok(())
    }

    async fn init_counters(&self, id: JobId, total_lines: i64) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.entry(id).or_insert_with(|| JobRecord {
            id,
            file_name: String::new(),
            status: JobStatus::Pending,
            total_lines: 0,
            processed_lines: 0,
            progress: 0.0,
            error_message: None,
        });
        job.total_lines = total_lines;
        job.processed_lines = 0;
        job.progress = 0.0;
        Ok(())
    }

    async fn increment_processed(&self, id: JobId) -> Result<Option<i64>, StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        Ok(jobs.get_mut(&id).map(|job| {
            job.processed_lines += 1;
            job.processed_lines
        }))
    }

    async fn set_progress(&self, id: JobId, progress: f64) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.get_mut(&id) {
            job.progress = progress;
            self.progress_writes.lock().unwrap().push(ProgressWrite {
                processed_lines: job.processed_lines,
                progress,
            });
        }
        Ok(())
    }

    async fn mark_completed(&self, id: JobId) -> Result<(), StoreError> {
        if let Some(job) = self.jobs.lock().unwrap().get_mut(&id) {
            job.status = JobStatus::Completed;
        }
        Ok(())
    }

    async fn mark_error(&self, id: JobId, message: &str) -> Result<(), StoreError> {
        if let Some(job) = self.jobs.lock().unwrap().get_mut(&id) {
            job.status = JobStatus::Error;
            job.error_message = Some(message.to_string());
        }
        Ok(())
    }

    async fn fetch(&self, id: JobId) -> Result<Option<JobRecord>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.jobs.lock().unwrap().get(&id).cloned())
    }
}

/// A cache whose every call fails, for exercising best-effort fallbacks.
pub struct FailingCache;

#[async_trait]
impl ProgressCache for FailingCache {
    async fn read_progress(&self, _id: JobId) -> Result<Option<f64>, CacheError> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn read_status(&self, _id: JobId) -> Result<Option<JobStatus>, CacheError> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn write_snapshot(
        &self,
        _id: JobId,
        _progress: f64,
        _processed_lines: i64,
    ) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn write_progress(&self, _id: JobId, _progress: f64) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".into()))
    }
}
