//! Repository for the `alerts` table.

use medchain_core::inventory::AlertType;
use medchain_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::{Alert, NewAlert};

/// Column list for `alerts` queries.
const COLUMNS: &str =
    "id, type, medicine_id, message, severity, is_resolved, created_at, resolved_at";

/// Provides lookup, insert, and resolve operations for alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Find the open (unresolved) alert of `alert_type` for a medicine.
    pub async fn find_open(
        pool: &PgPool,
        medicine_id: DbId,
        alert_type: AlertType,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM alerts \
             WHERE medicine_id = $1 AND type = $2 AND is_resolved = false \
             LIMIT 1",
        )
        .bind(medicine_id)
        .bind(alert_type.as_str())
        .fetch_optional(pool)
        .await
    }

    /// Insert an unresolved alert, returning the generated ID.
    ///
    /// Fails with a unique violation on `uq_alerts_open_per_type` if an
    /// open alert of the same type already exists for the medicine.
    pub async fn create(pool: &PgPool, alert: &NewAlert) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO alerts (type, medicine_id, message, severity) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(alert.alert_type.as_str())
        .bind(alert.medicine_id)
        .bind(&alert.message)
        .bind(alert.severity.as_str())
        .fetch_one(pool)
        .await
    }

    /// List alerts, newest first. Resolved alerts are only included when
    /// `include_resolved` is `true`.
    pub async fn list(
        pool: &PgPool,
        include_resolved: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let filter = if include_resolved {
            ""
        } else {
            "WHERE is_resolved = false"
        };
        let query = format!(
            "SELECT {COLUMNS} FROM alerts {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List all alerts raised for one medicine, newest first.
    pub async fn list_for_medicine(
        pool: &PgPool,
        medicine_id: DbId,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts WHERE medicine_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(medicine_id)
            .fetch_all(pool)
            .await
    }

    /// Resolve every open alert of `alert_type` for a medicine.
    ///
    /// Returns the number of alerts resolved.
    pub async fn resolve_open(
        pool: &PgPool,
        medicine_id: DbId,
        alert_type: AlertType,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE alerts \
             SET is_resolved = true, resolved_at = NOW() \
             WHERE medicine_id = $1 AND type = $2 AND is_resolved = false",
        )
        .bind(medicine_id)
        .bind(alert_type.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark an open alert as resolved.
    ///
    /// Returns `true` if the alert existed and was still open.
    pub async fn resolve(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE alerts \
             SET is_resolved = true, resolved_at = NOW() \
             WHERE id = $1 AND is_resolved = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
