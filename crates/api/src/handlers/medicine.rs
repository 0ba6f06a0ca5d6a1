//! Handlers for the `/medicines` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use medchain_core::error::CoreError;
use medchain_core::types::DbId;
use medchain_db::models::alert::Alert;
use medchain_db::models::medicine::{CreateMedicine, Medicine, UpdateMedicine};
use medchain_db::repositories::{AlertRepo, MedicineRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Medicine",
        id,
    })
}

/// GET /api/v1/medicines
///
/// List all medicines, newest first.
pub async fn list_medicines(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Medicine>>>> {
    let medicines = MedicineRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: medicines }))
}

/// POST /api/v1/medicines
///
/// Create a medicine. Status starts as `active`; the next monitoring run
/// classifies it.
pub async fn create_medicine(
    State(state): State<AppState>,
    Json(input): Json<CreateMedicine>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let medicine = MedicineRepo::create(&state.pool, &input).await?;
    tracing::info!(medicine_id = medicine.id, batch_id = %medicine.batch_id, "Medicine created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: medicine })))
}

/// GET /api/v1/medicines/{id}
pub async fn get_medicine(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Medicine>>> {
    let medicine = MedicineRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: medicine }))
}

/// PATCH /api/v1/medicines/{id}
///
/// Partially update the user-owned fields of a medicine.
pub async fn update_medicine(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMedicine>,
) -> AppResult<Json<DataResponse<Medicine>>> {
    input.validate()?;

    let medicine = MedicineRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: medicine }))
}

/// DELETE /api/v1/medicines/{id}
///
/// Returns 204 No Content, or 404 if the medicine does not exist.
pub async fn delete_medicine(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !MedicineRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(medicine_id = id, "Medicine deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/medicines/{id}/alerts
///
/// Full alert history of one medicine, resolved alerts included.
pub async fn list_medicine_alerts(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    if MedicineRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }
    let alerts = AlertRepo::list_for_medicine(&state.pool, id).await?;
    Ok(Json(DataResponse { data: alerts }))
}
