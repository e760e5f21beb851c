use std::sync::Arc;

use cinedex_core::store::MovieStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Movie storage (Postgres in production, in-memory in tests).
    pub movies: Arc<dyn MovieStore>,
}
