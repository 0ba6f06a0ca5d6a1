//! Route definitions for the inventory reports.

use axum::routing::get;
use axum::Router;

use crate::handlers::inventory;
use crate::state::AppState;

/// Routes mounted at `/inventory`.
///
/// ```text
/// GET    /summary       -> get_summary
/// GET    /low-stock     -> list_low_stock (?threshold, location)
/// GET    /expired       -> list_expired (?days, location)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(inventory::get_summary))
        .route("/low-stock", get(inventory::list_low_stock))
        .route("/expired", get(inventory::list_expired))
}
