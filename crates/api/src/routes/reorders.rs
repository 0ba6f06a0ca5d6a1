//! Route definitions for the `/reorders` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::reorder;
use crate::state::AppState;

/// Routes mounted at `/reorders`.
///
/// ```text
/// GET    /               -> list_reorders
/// PUT    /{id}/status    -> update_reorder_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reorder::list_reorders))
        .route("/{id}/status", put(reorder::update_reorder_status))
}
