//! Route definitions for the `/medicines` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::medicine;
use crate::state::AppState;

/// Routes mounted at `/medicines`.
///
/// ```text
/// GET    /              -> list_medicines
/// POST   /              -> create_medicine
/// GET    /{id}          -> get_medicine
/// PATCH  /{id}          -> update_medicine
/// DELETE /{id}          -> delete_medicine
/// GET    /{id}/alerts   -> list_medicine_alerts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(medicine::list_medicines).post(medicine::create_medicine),
        )
        .route(
            "/{id}",
            get(medicine::get_medicine)
                .patch(medicine::update_medicine)
                .delete(medicine::delete_medicine),
        )
        .route("/{id}/alerts", get(medicine::list_medicine_alerts))
}
