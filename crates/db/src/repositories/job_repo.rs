//! Repository for the `jobs` table.
//!
//! Uses `JobStatus` from `linemill_core` for every status literal and a
//! single `UPDATE ... RETURNING` statement for the processed-lines
//! counter, so concurrent workers never lose an increment.

use sqlx::PgPool;

use linemill_core::{JobId, JobStatus};

use crate::models::job::Job;

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, file_name, status, total_lines, processed_lines, progress, \
    error_message, created_at, updated_at";

/// Provides the persistence operations behind `PgJobStore`.
pub struct JobRepo;

impl JobRepo {
    /// Insert a fresh pending job with zeroed counters.
    pub async fn create(
        pool: &PgPool,
        id: JobId,
        file_name: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO jobs (id, file_name, status) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(file_name)
            .bind(JobStatus::Pending.as_str())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Upsert dispatch-time counters.
    ///
    /// Re-running this for an existing id resets `processed_lines` and
    /// `progress`, including while older units are still in flight. See
    /// the dispatcher docs for the resulting counter divergence.
    pub async fn init_counters(
        pool: &PgPool,
        id: JobId,
        total_lines: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO jobs (id, total_lines, processed_lines, progress) \
             VALUES ($1, $2, 0, 0) \
             ON CONFLICT (id) DO UPDATE \
             SET total_lines = EXCLUDED.total_lines, \
                 processed_lines = 0, \
                 progress = 0, \
                 updated_at = NOW()",
        )
        .bind(id)
        .bind(total_lines)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Atomically increment `processed_lines`, returning the new value.
    ///
    /// Returns `None` when the job row does not exist. The increment and
    /// readback are one statement, so no interleaving can lose updates.
    pub async fn increment_processed(
        pool: &PgPool,
        id: JobId,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE jobs \
             SET processed_lines = processed_lines + 1, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING processed_lines",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(n,)| n))
    }

    /// Persist a recomputed progress percentage.
    pub async fn set_progress(
        pool: &PgPool,
        id: JobId,
        progress: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET progress = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(progress)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a job completed.
    pub async fn complete(pool: &PgPool, id: JobId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(JobStatus::Completed.as_str())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a job failed with a descriptive message.
    pub async fn fail(
        pool: &PgPool,
        id: JobId,
        error_message: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET status = $2, error_message = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(JobStatus::Error.as_str())
        .bind(error_message)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: JobId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
