//! Handlers for the read-only inventory reports.
//!
//! Defaults for the stock threshold and expiry window come from the
//! monitor's thresholds, so the reports agree with what the monitor flags.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use medchain_core::types::Timestamp;
use medchain_db::models::medicine::Medicine;
use medchain_db::models::report::{DrugTotal, InventoryTotals, LocationSummary};
use medchain_db::repositories::ReportRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of medicine names listed in `top_drugs`.
const TOP_DRUGS_LIMIT: i64 = 5;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Body of `GET /inventory/summary`.
#[derive(Debug, Serialize)]
pub struct InventorySummary {
    #[serde(flatten)]
    pub totals: InventoryTotals,
    pub locations: Vec<LocationSummary>,
    pub top_drugs: Vec<DrugTotal>,
    pub generated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query params for `GET /inventory/low-stock`.
#[derive(Debug, Deserialize, Validate)]
pub struct LowStockQuery {
    /// Exclusive quantity threshold. Defaults to the low-stock threshold.
    #[validate(range(min = 0))]
    pub threshold: Option<i32>,
    pub location: Option<String>,
}

/// Query params for `GET /inventory/expired`.
#[derive(Debug, Deserialize, Validate)]
pub struct ExpiredQuery {
    /// Days ahead of today to include. `0` lists what has already expired.
    #[validate(range(min = 0, max = 3650))]
    pub days: Option<i64>,
    pub location: Option<String>,
}

/// An empty `?location=` means no filter.
fn location_filter(location: Option<&str>) -> Option<&str> {
    location.map(str::trim).filter(|l| !l.is_empty())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/inventory/summary
///
/// Totals, per-location breakdown, and the best-stocked medicine names.
pub async fn get_summary(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<InventorySummary>>> {
    let thresholds = &state.config.monitor.thresholds;
    let now = Utc::now();
    let expiring_by = now.date_naive() + Duration::days(thresholds.expiry_warning_days);

    let totals = ReportRepo::totals(&state.pool, thresholds.low_stock, expiring_by).await?;
    let locations = ReportRepo::by_location(&state.pool).await?;
    let top_drugs = ReportRepo::top_drugs(&state.pool, TOP_DRUGS_LIMIT).await?;

    Ok(Json(DataResponse {
        data: InventorySummary {
            totals,
            locations,
            top_drugs,
            generated_at: now,
        },
    }))
}

/// GET /api/v1/inventory/low-stock
///
/// Medicines below `threshold`, lowest quantity first.
pub async fn list_low_stock(
    State(state): State<AppState>,
    Query(params): Query<LowStockQuery>,
) -> AppResult<Json<DataResponse<Vec<Medicine>>>> {
    params.validate()?;

    let threshold = params
        .threshold
        .unwrap_or(state.config.monitor.thresholds.low_stock);
    let location = location_filter(params.location.as_deref());
    let medicines = ReportRepo::low_stock(&state.pool, threshold, location).await?;
    Ok(Json(DataResponse { data: medicines }))
}

/// GET /api/v1/inventory/expired
///
/// Medicines expiring within `days` (default `0`), soonest first.
pub async fn list_expired(
    State(state): State<AppState>,
    Query(params): Query<ExpiredQuery>,
) -> AppResult<Json<DataResponse<Vec<Medicine>>>> {
    params.validate()?;

    let cutoff = Utc::now().date_naive() + Duration::days(params.days.unwrap_or(0));
    let location = location_filter(params.location.as_deref());
    let medicines = ReportRepo::expiring_by(&state.pool, cutoff, location).await?;
    Ok(Json(DataResponse { data: medicines }))
}

/// GET /api/v1/locations
///
/// Distinct locations holding at least one medicine record.
pub async fn list_locations(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let locations = ReportRepo::locations(&state.pool).await?;
    Ok(Json(DataResponse { data: locations }))
}
