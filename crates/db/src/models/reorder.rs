//! Reorder entity model and DTOs.

use medchain_core::inventory::ReorderStatus;
use medchain_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reorders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reorder {
    pub id: DbId,
    pub medicine_id: DbId,
    pub quantity: i32,
    pub status: String,
    pub supplier: Option<String>,
    pub expected_delivery: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new reorder. Reorders are always created `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReorder {
    pub medicine_id: DbId,
    pub quantity: i32,
    pub supplier: Option<String>,
    pub expected_delivery: Option<Date>,
}

/// DTO for advancing a reorder through its fulfillment life cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReorderStatus {
    pub status: ReorderStatus,
}
