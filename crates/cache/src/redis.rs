//! Redis-backed progress cache.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use linemill_core::{CacheError, JobId, JobStatus, ProgressCache};

/// Progress mirror stored in Redis hashes.
///
/// `ConnectionManager` multiplexes one reconnecting connection; cloning
/// the handle is cheap and every worker can hold its own copy.
#[derive(Clone)]
pub struct RedisProgressCache {
    conn: ConnectionManager,
}

impl RedisProgressCache {
    /// Connect to the given Redis URL (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(map_err)?;
        let conn = ConnectionManager::new(client).await.map_err(map_err)?;
        Ok(Self { conn })
    }

    fn key(id: JobId) -> String {
        format!("job:{id}")
    }
}

fn map_err(err: redis::RedisError) -> CacheError {
    CacheError::Backend(err.to_string())
}

#[async_trait]
impl ProgressCache for RedisProgressCache {
    async fn read_progress(&self, id: JobId) -> Result<Option<f64>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn
            .hget(Self::key(id), "progress")
            .await
            .map_err(map_err)?;
        Ok(value.and_then(|raw| raw.parse().ok()))
    }

    async fn read_status(&self, id: JobId) -> Result<Option<JobStatus>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn
            .hget(Self::key(id), "status")
            .await
            .map_err(map_err)?;
        Ok(value.as_deref().and_then(JobStatus::parse))
    }

    async fn write_snapshot(
        &self,
        id: JobId,
        progress: f64,
        processed_lines: i64,
    ) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset_multiple(
                Self::key(id),
                &[
                    ("progress", progress.to_string()),
                    ("processed_lines", processed_lines.to_string()),
                ],
            )
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn write_progress(&self, id: JobId, progress: f64) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset(Self::key(id), "progress", progress.to_string())
            .await
            .map_err(map_err)?;
        Ok(())
    }
}
