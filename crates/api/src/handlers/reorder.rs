//! Handlers for the `/reorders` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use medchain_core::error::CoreError;
use medchain_core::inventory::ReorderStatus;
use medchain_core::types::DbId;
use medchain_db::models::reorder::{Reorder, UpdateReorderStatus};
use medchain_db::repositories::ReorderRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /reorders`.
#[derive(Debug, Deserialize)]
pub struct ReorderQuery {
    pub status: Option<ReorderStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/reorders
///
/// List reorders newest first, optionally filtered by `status`.
pub async fn list_reorders(
    State(state): State<AppState>,
    Query(params): Query<ReorderQuery>,
) -> AppResult<Json<DataResponse<Vec<Reorder>>>> {
    let page = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };
    let reorders = ReorderRepo::list(&state.pool, params.status, page.limit(), page.offset()).await?;
    Ok(Json(DataResponse { data: reorders }))
}

/// PUT /api/v1/reorders/{id}/status
///
/// Advance a reorder along its life cycle. Returns 400 for a transition the
/// life cycle does not allow and 409 if the reorder changed concurrently.
pub async fn update_reorder_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReorderStatus>,
) -> AppResult<Json<DataResponse<Reorder>>> {
    let reorder = ReorderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reorder",
            id,
        }))?;

    let current: ReorderStatus = reorder.status.parse()?;
    current.validate_transition(input.status)?;

    let updated = ReorderRepo::transition(&state.pool, id, current, input.status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Reorder {id} changed status concurrently"
            )))
        })?;

    tracing::info!(reorder_id = id, from = %current, to = %input.status, "Reorder status updated");
    Ok(Json(DataResponse { data: updated }))
}
