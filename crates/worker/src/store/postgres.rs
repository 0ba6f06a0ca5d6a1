use async_trait::async_trait;
use medchain_core::error::CoreError;
use medchain_core::inventory::{AlertType, MedicineStatus};
use medchain_core::monitoring::MedicineSnapshot;
use medchain_core::types::DbId;
use medchain_db::models::alert::NewAlert;
use medchain_db::models::reorder::NewReorder;
use medchain_db::repositories::{AlertRepo, MedicineRepo, ReorderRepo};
use medchain_db::DbPool;

use super::InventoryStore;
use crate::error::MonitorError;

/// [`InventoryStore`] backed by the PostgreSQL repositories.
#[derive(Clone)]
pub struct PgInventoryStore {
    pool: DbPool,
}

impl PgInventoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn list_medicines(&self) -> Result<Vec<MedicineSnapshot>, MonitorError> {
        let rows = MedicineRepo::list_for_monitoring(&self.pool).await?;

        let snapshots = rows
            .iter()
            .filter_map(|row| match row.snapshot() {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(medicine_id = row.id, error = %e, "Skipping unreadable medicine row");
                    None
                }
            })
            .collect();

        Ok(snapshots)
    }

    async fn set_medicine_status(
        &self,
        medicine_id: DbId,
        status: MedicineStatus,
    ) -> Result<(), MonitorError> {
        let found = MedicineRepo::update_status(&self.pool, medicine_id, status).await?;
        if !found {
            return Err(CoreError::NotFound {
                entity: "Medicine",
                id: medicine_id,
            }
            .into());
        }
        Ok(())
    }

    async fn find_open_alert(
        &self,
        medicine_id: DbId,
        alert_type: AlertType,
    ) -> Result<Option<DbId>, MonitorError> {
        Ok(AlertRepo::find_open(&self.pool, medicine_id, alert_type).await?)
    }

    async fn resolve_open_alerts(
        &self,
        medicine_id: DbId,
        alert_type: AlertType,
    ) -> Result<u64, MonitorError> {
        Ok(AlertRepo::resolve_open(&self.pool, medicine_id, alert_type).await?)
    }

    async fn insert_alert(&self, alert: &NewAlert) -> Result<DbId, MonitorError> {
        Ok(AlertRepo::create(&self.pool, alert).await?)
    }

    async fn find_open_reorder(&self, medicine_id: DbId) -> Result<Option<DbId>, MonitorError> {
        Ok(ReorderRepo::find_open(&self.pool, medicine_id).await?)
    }

    async fn insert_reorder(&self, reorder: &NewReorder) -> Result<DbId, MonitorError> {
        Ok(ReorderRepo::create(&self.pool, reorder).await?)
    }
}
