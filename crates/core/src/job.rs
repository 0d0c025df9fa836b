//! Job state as owned by the durable store.

use serde::{Deserialize, Serialize};

use crate::types::JobId;

/// Lifecycle status of a job.
///
/// The store only ever persists `Pending`, `Completed`, and `Error`.
/// `InProgress` is the effective state a reader reports while a job is
/// neither pending-fresh nor terminal; nothing in the pipeline writes it.
/// `Completed` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Error,
}

impl JobStatus {
    /// Wire/storage representation (matches the `jobs.status` column and
    /// the cache hash field).
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }

    /// Parse the storage representation. Returns `None` for unknown input
    /// so a corrupt cache field degrades to a miss instead of a panic.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(JobStatus::Pending),
            "in_progress" => Some(JobStatus::InProgress),
            "completed" => Some(JobStatus::Completed),
            "error" => Some(JobStatus::Error),
            _ => None,
        }
    }

    /// Whether this status ends the job's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// Authoritative job record, mirrored from the durable store.
///
/// Invariant: `0 <= processed_lines <= total_lines` as long as no job id
/// is re-dispatched while earlier units are still in flight (re-dispatch
/// resets the counters; see the dispatcher docs).
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub id: JobId,
    pub file_name: String,
    pub status: JobStatus,
    pub total_lines: i64,
    pub processed_lines: i64,
    /// Derived percentage in `[0, 100]`. Only refreshed on snapshot
    /// writes, so it can trail `processed_lines`.
    pub progress: f64,
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [
            JobStatus::Pending,
            JobStatus::InProgress,
            JobStatus::Completed,
            JobStatus::Error,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn unknown_status_parses_to_none() {
        assert_eq!(JobStatus::parse("paused"), None);
        assert_eq!(JobStatus::parse(""), None);
    }

    #[test]
    fn only_completed_and_error_are_terminal() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
    }
}
