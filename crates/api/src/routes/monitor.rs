//! Route definitions for the monitor trigger.

use axum::routing::get;
use axum::Router;

use crate::handlers::monitor;
use crate::state::AppState;

/// Routes mounted at `/functions`.
///
/// ```text
/// GET, POST  /monitor-inventory  -> run_monitor
/// ```
pub fn functions_router() -> Router<AppState> {
    Router::new().route(
        "/monitor-inventory",
        get(monitor::run_monitor).post(monitor::run_monitor),
    )
}

/// Routes mounted at `/api/v1/monitor`.
///
/// ```text
/// GET, POST  /run  -> run_monitor
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/run", get(monitor::run_monitor).post(monitor::run_monitor))
}
