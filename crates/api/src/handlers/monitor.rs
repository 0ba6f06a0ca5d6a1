//! Handler for the inventory monitor trigger.
//!
//! Unlike the management endpoints this one answers with a flat
//! `{ success, ... }` body that external schedulers check directly.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use medchain_core::types::Timestamp;
use medchain_worker::RunSummary;
use serde::Serialize;

use crate::state::AppState;

/// Per-pass counts reported by a successful run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Processed {
    pub expired: u32,
    pub low_stock: u32,
    pub expiring_soon: u32,
    pub critical_stock: u32,
}

impl From<RunSummary> for Processed {
    fn from(summary: RunSummary) -> Self {
        Self {
            expired: summary.expired,
            low_stock: summary.low_stock,
            expiring_soon: summary.expiring_soon,
            critical_stock: summary.critical_stock,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MonitorSuccess {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: Timestamp,
    pub processed: Processed,
    /// Medicines skipped because a write for them failed.
    pub failed: u32,
}

#[derive(Debug, Serialize)]
pub struct MonitorFailure {
    pub success: bool,
    pub error: String,
    pub timestamp: Timestamp,
}

/// GET|POST /functions/monitor-inventory, /api/v1/monitor/run
///
/// Run one full monitoring pass. Returns 200 with the per-pass counts, or
/// 500 if the run was aborted.
pub async fn run_monitor(State(state): State<AppState>) -> Response {
    let started = Utc::now();

    match state.monitor.run_once(started).await {
        Ok(summary) => {
            let body = MonitorSuccess {
                success: true,
                message: "Inventory monitoring completed",
                timestamp: Utc::now(),
                failed: summary.failed,
                processed: summary.into(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Inventory monitoring run failed");
            let body = MonitorFailure {
                success: false,
                error: e.to_string(),
                timestamp: Utc::now(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
