use serde::{Deserialize, Serialize};

/// Opaque job identifier, assigned once at submission.
pub type JobId = uuid::Uuid;

/// One point-in-time progress observation for a job.
///
/// This is the exact payload pushed over the streaming channel once per
/// poll: `{ "job_id": "<uuid>", "progress": 42.0 }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub job_id: JobId,
    pub progress: f64,
}
