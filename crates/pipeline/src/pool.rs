//! Fixed-size worker pool draining the task queue.

use std::sync::Arc;

use tokio::task::JoinHandle;

use linemill_core::{JobStore, ProgressCache};

use crate::processor::process_line;
use crate::task::TaskReceiver;

/// A pool of independent workers, each running its own receive loop over
/// the shared MPMC queue. Workers apply no ordering or locality between
/// units; the queue bound is the only fan-out limit.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` receive loops. The pool drains until every sender
    /// side of the queue is dropped.
    pub fn spawn(
        workers: usize,
        queue: TaskReceiver,
        store: Arc<dyn JobStore>,
        cache: Arc<dyn ProgressCache>,
    ) -> Self {
        let handles = (0..workers)
            .map(|worker| {
                let queue = queue.clone();
                let store = Arc::clone(&store);
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    tracing::debug!(worker, "worker started");
                    while let Ok(task) = queue.recv().await {
                        if let Err(err) = process_line(store.as_ref(), cache.as_ref(), &task).await
                        {
                            // The unit is dropped, not retried: its increment
                            // is lost and the job can no longer complete
                            // naturally. Known gap.
                            tracing::error!(
                                worker,
                                job_id = %task.job_id,
                                line = task.line_number,
                                error = %err,
                                "unit of work failed"
                            );
                        }
                    }
                    tracing::debug!(worker, "worker stopped, queue closed");
                })
            })
            .collect();

        Self { handles }
    }

    /// Wait for all workers to drain and exit. Only returns once every
    /// `TaskSender` clone has been dropped.
    pub async fn join(self) {
        for handle in self.handles {
            // A worker panicking is a bug; surface it loudly.
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "worker task panicked");
            }
        }
    }
}
