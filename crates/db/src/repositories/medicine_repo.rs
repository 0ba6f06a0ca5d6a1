//! Repository for the `medicines` table.

use medchain_core::inventory::MedicineStatus;
use medchain_core::types::DbId;
use sqlx::PgPool;

use crate::models::medicine::{CreateMedicine, Medicine, UpdateMedicine};

/// Column list for `medicines` queries.
const COLUMNS: &str = "id, name, batch_id, manufacturer, quantity, expiry_date, location, \
     status, created_at, updated_at";

/// Provides CRUD operations for medicines.
pub struct MedicineRepo;

impl MedicineRepo {
    /// List all medicines, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Medicine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medicines ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Medicine>(&query).fetch_all(pool).await
    }

    /// Load every medicine in id order for a monitoring run.
    pub async fn list_for_monitoring(pool: &PgPool) -> Result<Vec<Medicine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medicines ORDER BY id");
        sqlx::query_as::<_, Medicine>(&query).fetch_all(pool).await
    }

    /// Find a medicine by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Medicine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medicines WHERE id = $1");
        sqlx::query_as::<_, Medicine>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new medicine with status `active`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMedicine) -> Result<Medicine, sqlx::Error> {
        let query = format!(
            "INSERT INTO medicines \
                (name, batch_id, manufacturer, quantity, expiry_date, location, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Medicine>(&query)
            .bind(&input.name)
            .bind(&input.batch_id)
            .bind(&input.manufacturer)
            .bind(input.quantity)
            .bind(input.expiry_date)
            .bind(&input.location)
            .bind(MedicineStatus::Active.as_str())
            .fetch_one(pool)
            .await
    }

    /// Update the user-owned fields of a medicine. Only non-`None` fields
    /// are applied. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMedicine,
    ) -> Result<Option<Medicine>, sqlx::Error> {
        let query = format!(
            "UPDATE medicines SET \
                name = COALESCE($2, name), \
                batch_id = COALESCE($3, batch_id), \
                manufacturer = COALESCE($4, manufacturer), \
                quantity = COALESCE($5, quantity), \
                expiry_date = COALESCE($6, expiry_date), \
                location = COALESCE($7, location) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Medicine>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.batch_id)
            .bind(&input.manufacturer)
            .bind(input.quantity)
            .bind(input.expiry_date)
            .bind(&input.location)
            .fetch_optional(pool)
            .await
    }

    /// Set the derived status of a medicine.
    ///
    /// Returns `true` if the row exists and was updated.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: MedicineStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE medicines SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a medicine together with its alerts and reorders.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM medicines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
