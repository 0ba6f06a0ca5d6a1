//! Handlers for the `/alerts` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use medchain_core::error::CoreError;
use medchain_core::types::DbId;
use medchain_db::models::alert::Alert;
use medchain_db::repositories::AlertRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /alerts`.
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    /// Include resolved alerts. Defaults to `false`.
    #[serde(default)]
    pub include_resolved: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/alerts
///
/// List alerts newest first; open alerts only unless `include_resolved`.
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(params): Query<AlertQuery>,
) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    let page = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };
    let alerts = AlertRepo::list(
        &state.pool,
        params.include_resolved,
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// POST /api/v1/alerts/{id}/resolve
///
/// Resolve an open alert. Returns 204, or 404 if the alert does not exist
/// or is already resolved. Once resolved, the monitor may raise a new alert
/// of the same type on its next run.
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AlertRepo::resolve(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Alert", id }));
    }
    tracing::info!(alert_id = id, "Alert resolved");
    Ok(StatusCode::NO_CONTENT)
}
