use std::sync::Arc;

use linemill_core::{JobStore, ProgressCache};
use linemill_pipeline::TaskSender;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Every collaborator is constructed in `main` and injected here; no
/// module-level client singletons. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Durable job store (authoritative).
    pub store: Arc<dyn JobStore>,
    /// Fast progress cache (best effort).
    pub cache: Arc<dyn ProgressCache>,
    /// Sender side of the bounded unit-of-work queue.
    pub queue: TaskSender,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
