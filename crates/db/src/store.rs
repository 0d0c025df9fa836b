//! `JobStore` implementation over Postgres.

use async_trait::async_trait;
use sqlx::PgPool;

use linemill_core::{JobId, JobRecord, JobStore, StoreError};

use crate::repositories::JobRepo;

/// Adapts [`JobRepo`] to the narrow [`JobStore`] seam.
///
/// Holds its own pool handle; cloning is cheap and every clone shares the
/// same underlying connections.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_err(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn create_job(&self, id: JobId, file_name: &str) -> Result<(), StoreError> {
        JobRepo::create(&self.pool, id, file_name)
            .await
            .map_err(map_err)
    }

    async fn init_counters(&self, id: JobId, total_lines: i64) -> Result<(), StoreError> {
        JobRepo::init_counters(&self.pool, id, total_lines)
            .await
            .map_err(map_err)
    }

    async fn increment_processed(&self, id: JobId) -> Result<Option<i64>, StoreError> {
        JobRepo::increment_processed(&self.pool, id)
            .await
            .map_err(map_err)
    }

    async fn set_progress(&self, id: JobId, progress: f64) -> Result<(), StoreError> {
        JobRepo::set_progress(&self.pool, id, progress)
            .await
            .map_err(map_err)
    }

    async fn mark_completed(&self, id: JobId) -> Result<(), StoreError> {
        JobRepo::complete(&self.pool, id).await.map_err(map_err)
    }

    async fn mark_error(&self, id: JobId, message: &str) -> Result<(), StoreError> {
        JobRepo::fail(&self.pool, id, message)
            .await
            .map_err(map_err)
    }

    async fn fetch(&self, id: JobId) -> Result<Option<JobRecord>, StoreError> {
        let row = JobRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_err)?;
        Ok(row.map(|job| job.into_record()))
    }
}
