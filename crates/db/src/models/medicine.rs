//! Medicine entity model and DTOs.

use medchain_core::error::CoreError;
use medchain_core::monitoring::MedicineSnapshot;
use medchain_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `medicines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Medicine {
    pub id: DbId,
    pub name: String,
    pub batch_id: String,
    pub manufacturer: String,
    pub quantity: i32,
    pub expiry_date: Date,
    pub location: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Medicine {
    /// The subset of the row the classification rules read, with the
    /// status parsed into its enum.
    pub fn snapshot(&self) -> Result<MedicineSnapshot, CoreError> {
        Ok(MedicineSnapshot {
            id: self.id,
            name: self.name.clone(),
            batch_id: self.batch_id.clone(),
            manufacturer: self.manufacturer.clone(),
            quantity: self.quantity,
            expiry_date: self.expiry_date,
            location: self.location.clone(),
            status: self.status.parse()?,
        })
    }
}

/// DTO for creating a medicine. Status always starts as `active`; the
/// monitor reclassifies it on its next run.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMedicine {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub batch_id: String,
    #[validate(length(min = 1, max = 200))]
    pub manufacturer: String,
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub expiry_date: Date,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
}

/// DTO for a partial update of the user-owned fields of a medicine.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMedicine {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub batch_id: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub manufacturer: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    pub expiry_date: Option<Date>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
}
