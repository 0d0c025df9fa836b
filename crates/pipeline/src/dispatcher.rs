//! Task dispatcher: splits a job's input file into line tasks.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use linemill_core::{retry_store, JobId, JobStore, StoreError};

use crate::task::{LineTask, TaskSender};
use crate::STORE_RETRY;

/// Split the file at `path` into one task per line and enqueue them all.
///
/// Counts the total lines first, then upserts the job's counters
/// (`total_lines` set, `processed_lines` and `progress` zeroed), then
/// emits tasks in file order. Re-dispatching an id whose earlier units are
/// still in flight resets the counters mid-run and leaves
/// `processed_lines` diverged from `total_lines`; callers must not do
/// that.
///
/// If the input cannot be read, no units are emitted; the job is marked
/// `error` with a descriptive message instead. This is the only terminal
/// transition the dispatcher performs.
pub async fn dispatch_job(
    store: &dyn JobStore,
    queue: &TaskSender,
    job_id: JobId,
    path: &Path,
) -> Result<(), StoreError> {
    let total_lines = match count_lines(path).await {
        Ok(total) => total,
        Err(err) => {
            tracing::error!(job_id = %job_id, path = %path.display(), error = %err, "failed to read job input");
            let message = err.to_string();
            retry_store(&STORE_RETRY, || store.mark_error(job_id, &message)).await?;
            return Ok(());
        }
    };

    retry_store(&STORE_RETRY, || store.init_counters(job_id, total_lines)).await?;
    tracing::info!(job_id = %job_id, total_lines, "dispatching job");

    // Second pass: emit one task per line. The bounded queue applies
    // backpressure here rather than dropping units.
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(err) => {
            tracing::error!(job_id = %job_id, error = %err, "failed to reopen job input");
            let message = err.to_string();
            retry_store(&STORE_RETRY, || store.mark_error(job_id, &message)).await?;
            return Ok(());
        }
    };

    let mut lines = BufReader::new(file).lines();
    let mut line_number: i64 = 0;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                tracing::error!(job_id = %job_id, line_number, error = %err, "failed reading job input mid-dispatch");
                let message = err.to_string();
                retry_store(&STORE_RETRY, || store.mark_error(job_id, &message)).await?;
                return Ok(());
            }
        };
        line_number += 1;
        let task = LineTask {
            job_id,
            line_content: line.trim().to_string(),
            line_number,
            total_lines,
        };
        if queue.send(task).await.is_err() {
            // Queue closed: the worker pool is shutting down.
            tracing::warn!(job_id = %job_id, line_number, "task queue closed mid-dispatch");
            return Ok(());
        }
    }

    Ok(())
}

/// Count the lines in the file without consuming the dispatch pass.
async fn count_lines(path: &Path) -> Result<i64, std::io::Error> {
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();
    let mut total: i64 = 0;
    while lines.next_line().await?.is_some() {
        total += 1;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use linemill_core::JobStatus;

    use super::*;
    use crate::processor::process_line;
    use crate::task::task_queue;
    use crate::testing::MemoryJobStore;

    fn fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[tokio::test]
    async fn five_line_file_dispatches_five_ordered_tasks() {
        let store = MemoryJobStore::with_job("input.txt");
        let job_id = store.only_job_id();
        let (tx, rx) = task_queue(16);
        let file = fixture("alpha\nbravo charlie\ndelta\necho\nfoxtrot\n");

        dispatch_job(&store, &tx, job_id, file.path()).await.unwrap();

        let job = store.fetch(job_id).await.unwrap().unwrap();
        assert_eq!(job.total_lines, 5);
        assert_eq!(job.processed_lines, 0);
        assert_eq!(job.progress, 0.0);

        drop(tx);
        let mut tasks = Vec::new();
        while let Ok(task) = rx.recv().await {
            tasks.push(task);
        }
        assert_eq!(tasks.len(), 5);
        for (i, task) in tasks.iter().enumerate() {
            assert_eq!(task.line_number, i as i64 + 1);
            assert_eq!(task.total_lines, 5);
            assert_eq!(task.job_id, job_id);
        }
        assert_eq!(tasks[1].line_content, "bravo charlie");
    }

    #[tokio::test]
    async fn unreadable_input_marks_the_job_errored_and_emits_nothing() {
        let store = MemoryJobStore::with_job("missing.txt");
        let job_id = store.only_job_id();
        let (tx, rx) = task_queue(16);

        dispatch_job(&store, &tx, job_id, Path::new("/nonexistent/input.txt"))
            .await
            .unwrap();

        let job = store.fetch(job_id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert!(job.error_message.is_some());

        drop(tx);
        assert!(rx.recv().await.is_err(), "no units should be dispatched");
    }

    #[tokio::test]
    async fn empty_file_dispatches_no_units_and_stays_pending() {
        let store = MemoryJobStore::with_job("empty.txt");
        let job_id = store.only_job_id();
        let (tx, rx) = task_queue(16);
        let file = fixture("");

        dispatch_job(&store, &tx, job_id, file.path()).await.unwrap();

        let job = store.fetch(job_id).await.unwrap().unwrap();
        assert_eq!(job.total_lines, 0);
        assert_eq!(job.status, JobStatus::Pending);

        drop(tx);
        assert!(rx.recv().await.is_err());
    }

    /// Documented limitation, not a feature: re-dispatching a job id while
    /// earlier units are still in flight resets the counters and the job
    /// can no longer complete naturally.
    #[tokio::test]
    async fn redispatch_mid_flight_diverges_the_counters() {
        let store = Arc::new(MemoryJobStore::with_job("input.txt"));
        let cache = linemill_cache::MemoryProgressCache::new();
        let job_id = store.only_job_id();
        let (tx, rx) = task_queue(16);
        let file = fixture("a\nb\nc\nd\ne\n");

        dispatch_job(store.as_ref(), &tx, job_id, file.path())
            .await
            .unwrap();

        // Three of five units finish before the re-dispatch.
        for _ in 0..3 {
            let task = rx.recv().await.unwrap();
            process_line(store.as_ref(), &cache, &task).await.unwrap();
        }

        dispatch_job(store.as_ref(), &tx, job_id, file.path())
            .await
            .unwrap();

        // The two stale units from the first dispatch land after the reset.
        for _ in 0..2 {
            let task = rx.recv().await.unwrap();
            process_line(store.as_ref(), &cache, &task).await.unwrap();
        }

        let job = store.fetch(job_id).await.unwrap().unwrap();
        assert_eq!(job.total_lines, 5);
        assert_eq!(job.processed_lines, 2, "counters were silently reset");
        assert_ne!(job.status, JobStatus::Completed);
    }
}
