//! Job execution pipeline: dispatch, per-line processing, and the
//! cache-coherent progress read path.
//!
//! Data flow: [`dispatch_job`] splits a submitted file into one
//! [`LineTask`] per line and pushes them into a bounded queue; a
//! [`WorkerPool`] drains the queue and runs [`process_line`] on each unit,
//! advancing the durable counters; a [`ProgressReader`] serves the
//! streaming read path, preferring the cache and falling back to the
//! store on miss.

use std::time::Duration;

use linemill_core::RetryPolicy;

pub mod dispatcher;
pub mod pool;
pub mod processor;
pub mod reader;
pub mod task;

pub use dispatcher::dispatch_job;
pub use pool::WorkerPool;
pub use processor::process_line;
pub use reader::ProgressReader;
pub use task::{task_queue, LineTask, TaskReceiver, TaskSender};

/// Retry budget for durable-store calls: exhaustion is fatal to the
/// calling unit or dispatch flow.
pub const STORE_RETRY: RetryPolicy = RetryPolicy::new(3, Duration::from_millis(100));

/// Retry budget for cache calls: exhaustion degrades to a cache miss.
pub const CACHE_RETRY: RetryPolicy = RetryPolicy::new(2, Duration::from_millis(100));

#[cfg(test)]
pub(crate) mod testing;
