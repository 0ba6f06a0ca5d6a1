//! Repository for the `reorders` table.

use medchain_core::inventory::{ReorderStatus, OPEN_REORDER_STATUSES};
use medchain_core::types::DbId;
use sqlx::PgPool;

use crate::models::reorder::{NewReorder, Reorder};

/// Column list for `reorders` queries.
const COLUMNS: &str = "id, medicine_id, quantity, status, supplier, expected_delivery, \
     created_at, updated_at";

/// Provides lookup, insert, and status operations for reorders.
pub struct ReorderRepo;

impl ReorderRepo {
    /// Find the open (`pending` or `ordered`) reorder for a medicine.
    pub async fn find_open(pool: &PgPool, medicine_id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let open: Vec<&str> = OPEN_REORDER_STATUSES.iter().map(|s| s.as_str()).collect();
        sqlx::query_scalar(
            "SELECT id FROM reorders \
             WHERE medicine_id = $1 AND status = ANY($2) \
             LIMIT 1",
        )
        .bind(medicine_id)
        .bind(&open)
        .fetch_optional(pool)
        .await
    }

    /// Insert a `pending` reorder, returning the generated ID.
    ///
    /// Fails with a unique violation on `uq_reorders_open_per_medicine` if
    /// the medicine already has an open reorder.
    pub async fn create(pool: &PgPool, reorder: &NewReorder) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO reorders (medicine_id, quantity, status, supplier, expected_delivery) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(reorder.medicine_id)
        .bind(reorder.quantity)
        .bind(ReorderStatus::Pending.as_str())
        .bind(&reorder.supplier)
        .bind(reorder.expected_delivery)
        .fetch_one(pool)
        .await
    }

    /// Find a reorder by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reorder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reorders WHERE id = $1");
        sqlx::query_as::<_, Reorder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List reorders newest first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        status: Option<ReorderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Reorder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reorders \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Reorder>(&query)
            .bind(status.map(ReorderStatus::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Move a reorder from `from` to `to`.
    ///
    /// The update only applies while the row is still in `from`, so two
    /// concurrent fulfillment actions cannot both succeed. Returns the
    /// updated row, or `None` if the row is missing or has moved on.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: ReorderStatus,
        to: ReorderStatus,
    ) -> Result<Option<Reorder>, sqlx::Error> {
        let query = format!(
            "UPDATE reorders SET status = $3 \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reorder>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }
}
