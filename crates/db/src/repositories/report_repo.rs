//! Aggregate and filtered reads over the `medicines` table.

use medchain_core::types::Date;
use sqlx::PgPool;

use crate::models::medicine::Medicine;
use crate::models::report::{DrugTotal, InventoryTotals, LocationSummary};

/// Column list for `medicines` rows returned by reports.
const COLUMNS: &str = "id, name, batch_id, manufacturer, quantity, expiry_date, location, \
     status, created_at, updated_at";

/// Provides the inventory reporting queries.
pub struct ReportRepo;

impl ReportRepo {
    /// Counts across all medicines. `low_stock` is the exclusive quantity
    /// threshold; `expiring_by` the inclusive expiry cutoff.
    pub async fn totals(
        pool: &PgPool,
        low_stock: i32,
        expiring_by: Date,
    ) -> Result<InventoryTotals, sqlx::Error> {
        sqlx::query_as::<_, InventoryTotals>(
            "SELECT \
                COUNT(*)::BIGINT AS total_medicines, \
                COALESCE(SUM(quantity), 0)::BIGINT AS total_quantity, \
                COUNT(*) FILTER (WHERE quantity < $1) AS low_stock_count, \
                COUNT(*) FILTER (WHERE expiry_date <= $2) AS expiring_count \
             FROM medicines",
        )
        .bind(low_stock)
        .bind(expiring_by)
        .fetch_one(pool)
        .await
    }

    /// Per-location medicine count and quantity, by location name.
    pub async fn by_location(pool: &PgPool) -> Result<Vec<LocationSummary>, sqlx::Error> {
        sqlx::query_as::<_, LocationSummary>(
            "SELECT \
                location, \
                COUNT(*)::BIGINT AS medicine_count, \
                SUM(quantity)::BIGINT AS total_quantity \
             FROM medicines \
             GROUP BY location \
             ORDER BY location",
        )
        .fetch_all(pool)
        .await
    }

    /// Medicine names with the most stock, largest first.
    pub async fn top_drugs(pool: &PgPool, limit: i64) -> Result<Vec<DrugTotal>, sqlx::Error> {
        sqlx::query_as::<_, DrugTotal>(
            "SELECT name, SUM(quantity)::BIGINT AS total_quantity \
             FROM medicines \
             GROUP BY name \
             ORDER BY total_quantity DESC, name \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Medicines with quantity below `threshold`, lowest first, optionally
    /// restricted to one location.
    pub async fn low_stock(
        pool: &PgPool,
        threshold: i32,
        location: Option<&str>,
    ) -> Result<Vec<Medicine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM medicines \
             WHERE quantity < $1 AND ($2::TEXT IS NULL OR location = $2) \
             ORDER BY quantity, id"
        );
        sqlx::query_as::<_, Medicine>(&query)
            .bind(threshold)
            .bind(location)
            .fetch_all(pool)
            .await
    }

    /// Medicines expiring on or before `cutoff`, soonest first, optionally
    /// restricted to one location.
    pub async fn expiring_by(
        pool: &PgPool,
        cutoff: Date,
        location: Option<&str>,
    ) -> Result<Vec<Medicine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM medicines \
             WHERE expiry_date <= $1 AND ($2::TEXT IS NULL OR location = $2) \
             ORDER BY expiry_date, id"
        );
        sqlx::query_as::<_, Medicine>(&query)
            .bind(cutoff)
            .bind(location)
            .fetch_all(pool)
            .await
    }

    /// Distinct locations holding at least one medicine record.
    pub async fn locations(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT location FROM medicines ORDER BY location")
            .fetch_all(pool)
            .await
    }
}
