use std::sync::Arc;

use medchain_worker::Monitor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: medchain_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Inventory monitor shared by the HTTP trigger and the scheduler, so
    /// both go through the same run lock.
    pub monitor: Arc<Monitor>,
}
