use thiserror::Error;

/// Failure talking to the durable job store.
///
/// The store is authoritative: once the retry budget is spent this error
/// propagates out of the operation in progress.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("durable store error: {0}")]
    Backend(String),
}

/// Failure talking to the fast cache.
///
/// Never fatal: wrappers degrade an exhausted retry budget to a cache
/// miss and callers fall back to the durable store.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache error: {0}")]
    Backend(String),
}
