pub mod alerts;
pub mod health;
pub mod inventory;
pub mod medicines;
pub mod monitor;
pub mod reorders;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /monitor/run                    trigger a monitoring run (GET, POST)
///
/// /medicines                      list, create
/// /medicines/{id}                 get, update (PATCH), delete
/// /medicines/{id}/alerts          alert history of one medicine
///
/// /alerts                         list (?include_resolved, limit, offset)
/// /alerts/{id}/resolve            resolve (POST)
///
/// /reorders                       list (?status, limit, offset)
/// /reorders/{id}/status           life-cycle transition (PUT)
///
/// /inventory/summary              totals, per-location breakdown, top drugs
/// /inventory/low-stock            below a threshold (?threshold, location)
/// /inventory/expired              expiring within N days (?days, location)
/// /locations                      distinct locations
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/monitor", monitor::router())
        .nest("/medicines", medicines::router())
        .nest("/alerts", alerts::router())
        .nest("/reorders", reorders::router())
        .nest("/inventory", inventory::router())
        .route("/locations", get(handlers::inventory::list_locations))
}
