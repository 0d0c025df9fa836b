//! Response payloads for API handlers.

use serde::Serialize;

use linemill_core::JobId;

/// Response for a successfully submitted job.
#[derive(Debug, Serialize)]
pub struct JobCreated {
    pub job_id: JobId,
    pub message: &'static str,
}
