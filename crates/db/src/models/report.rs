//! Read-only inventory reports.

use serde::Serialize;
use sqlx::FromRow;

/// Table-wide counts for the inventory summary.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryTotals {
    pub total_medicines: i64,
    pub total_quantity: i64,
    /// Medicines with quantity below the low-stock threshold.
    pub low_stock_count: i64,
    /// Medicines whose expiry date falls on or before the warning cutoff.
    pub expiring_count: i64,
}

/// Stock held at one location.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LocationSummary {
    pub location: String,
    pub medicine_count: i64,
    pub total_quantity: i64,
}

/// Total stock of one medicine name across batches and locations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DrugTotal {
    pub name: String,
    pub total_quantity: i64,
}
