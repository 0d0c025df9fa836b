//! Unit processor: executes one line task and advances the job counters.

use linemill_core::{retry_cache, retry_store, ProgressCache, JobStore, StoreError};

use crate::task::LineTask;
use crate::{CACHE_RETRY, STORE_RETRY};

/// Snapshot writes happen every this-many processed lines (and always on
/// completion). With N units this bounds durable `progress` writes to
/// roughly N/10 instead of N.
pub const SNAPSHOT_INTERVAL: i64 = 10;

/// Execute one unit of work and record its completion.
///
/// Steps: run the line transform, atomically bump `processed_lines`
/// (the returned value is the readback; it may already include
/// increments from concurrently running processors), recompute the
/// percentage, and apply the batching policy. On completion the terminal
/// `completed` status is a second, separate durable write, and the cache
/// mirror is best-effort throughout.
///
/// Store failures propagate after the retry budget is spent; the caller
/// marks the unit failed and its increment is lost. A missing job row is
/// logged and the unit dropped.
pub async fn process_line(
    store: &dyn JobStore,
    cache: &dyn ProgressCache,
    task: &LineTask,
) -> Result<(), StoreError> {
    let word_count = index_line(&task.line_content);
    tracing::debug!(
        job_id = %task.job_id,
        line = task.line_number,
        total = task.total_lines,
        word_count,
        "processed line"
    );

    let processed = match retry_store(&STORE_RETRY, || store.increment_processed(task.job_id))
        .await?
    {
        Some(processed) => processed,
        None => {
            tracing::warn!(job_id = %task.job_id, "job not found in durable store");
            return Ok(());
        }
    };

    let progress = if task.total_lines == 0 {
        0.0
    } else {
        processed as f64 / task.total_lines as f64 * 100.0
    };

    // Batching policy: persist a snapshot only every SNAPSHOT_INTERVAL
    // lines or on completion. Interleaved readbacks can make several
    // processors snapshot redundantly, or none at a given multiple;
    // only the final state matters.
    if processed % SNAPSHOT_INTERVAL == 0 || progress >= 100.0 {
        retry_store(&STORE_RETRY, || store.set_progress(task.job_id, progress)).await?;

        if progress >= 100.0 {
            retry_store(&STORE_RETRY, || store.mark_completed(task.job_id)).await?;
            tracing::info!(job_id = %task.job_id, "job completed");
        }

        let mirrored = retry_cache(&CACHE_RETRY, || {
            cache.write_snapshot(task.job_id, progress, processed)
        })
        .await;
        if mirrored.is_none() {
            tracing::debug!(job_id = %task.job_id, "cache snapshot skipped");
        }
    }

    Ok(())
}

/// The domain transform for one line. Latency is workload-dependent; the
/// current transform is a simple word-count index.
fn index_line(line_content: &str) -> usize {
    line_content.split_whitespace().count()
}
