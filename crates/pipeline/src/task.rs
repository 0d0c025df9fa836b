//! Units of work and the bounded queue that carries them.

use linemill_core::JobId;

/// One line's worth of independent processing.
///
/// Ephemeral, never persisted. `total_lines` is a denormalized copy taken
/// at dispatch time so processors can compute progress without an extra
/// store read.
#[derive(Debug, Clone)]
pub struct LineTask {
    pub job_id: JobId,
    pub line_content: String,
    /// 1-based position in the file. Informational only; no ordering
    /// guarantee is attached to it.
    pub line_number: i64,
    pub total_lines: i64,
}

pub type TaskSender = async_channel::Sender<LineTask>;
pub type TaskReceiver = async_channel::Receiver<LineTask>;

/// Build the bounded work queue shared by the dispatcher and the worker
/// pool. A full queue suspends the dispatcher instead of dropping units,
/// which caps the fan-out for very large inputs.
pub fn task_queue(depth: usize) -> (TaskSender, TaskReceiver) {
    async_channel::bounded(depth)
}
