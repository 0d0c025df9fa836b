//! Job entity model for the `jobs` table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use linemill_core::{JobId, JobRecord, JobStatus};

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: JobId,
    pub file_name: String,
    pub status: String,
    pub total_lines: i64,
    pub processed_lines: i64,
    pub progress: f64,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Convert the row into the storage-agnostic record the pipeline
    /// works with. An unparseable status column is reported as the
    /// reader-side default, `in_progress`.
    pub fn into_record(self) -> JobRecord {
        let status = JobStatus::parse(&self.status).unwrap_or(JobStatus::InProgress);
        JobRecord {
            id: self.id,
            file_name: self.file_name,
            status,
            total_lines: self.total_lines,
            processed_lines: self.processed_lines,
            progress: self.progress,
            error_message: self.error_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> Job {
        Job {
            id: uuid::Uuid::new_v4(),
            file_name: "input.txt".into(),
            status: status.into(),
            total_lines: 5,
            processed_lines: 2,
            progress: 40.0,
            error_message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_converts_to_record() {
        let record = row("pending").into_record();
        assert_eq!(record.status, JobStatus::Pending);
        assert_eq!(record.total_lines, 5);
        assert_eq!(record.processed_lines, 2);
        assert_eq!(record.progress, 40.0);
    }

    #[test]
    fn unknown_status_column_defaults_to_in_progress() {
        let record = row("archived").into_record();
        assert_eq!(record.status, JobStatus::InProgress);
    }
}
