//! Fast-cache implementations of the `ProgressCache` seam.
//!
//! [`RedisProgressCache`] is the production backend: one Redis hash per
//! job, keyed `job:<job_id>`, all fields stored as strings. The cache is
//! a disposable projection of the durable store; flushing it costs
//! latency, never correctness.
//!
//! [`MemoryProgressCache`] is the in-process twin with identical
//! semantics, used by tests and by deployments without a Redis.

pub mod memory;
pub mod redis;

pub use memory::MemoryProgressCache;
pub use redis::RedisProgressCache;
