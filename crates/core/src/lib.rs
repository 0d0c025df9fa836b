//! Domain types and collaborator seams for the linemill job pipeline.
//!
//! The durable store and the fast cache are external collaborators; this
//! crate defines the narrow traits they are consumed through ([`JobStore`],
//! [`ProgressCache`]) plus the retry policy that wraps every call to them.

pub mod cache;
pub mod error;
pub mod job;
pub mod retry;
pub mod store;
pub mod types;

pub use cache::ProgressCache;
pub use error::{CacheError, StoreError};
pub use job::{JobRecord, JobStatus};
pub use retry::{retry_cache, retry_store, RetryPolicy};
pub use store::JobStore;
pub use types::{JobId, ProgressSnapshot};
