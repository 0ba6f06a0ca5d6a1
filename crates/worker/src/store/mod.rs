//! Storage seam for the monitor.
//!
//! The orchestrator and writers only talk to [`InventoryStore`], which is
//! injected as an `Arc<dyn InventoryStore>`. [`PgInventoryStore`] is the
//! production implementation; [`MemoryInventoryStore`] backs the tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use medchain_core::inventory::{AlertType, MedicineStatus};
use medchain_core::monitoring::MedicineSnapshot;
use medchain_core::types::DbId;
use medchain_db::models::alert::NewAlert;
use medchain_db::models::reorder::NewReorder;

use crate::error::MonitorError;

pub use memory::MemoryInventoryStore;
pub use postgres::PgInventoryStore;

/// Reads and writes the monitor performs against the shared tables.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Load every medicine for a run.
    async fn list_medicines(&self) -> Result<Vec<MedicineSnapshot>, MonitorError>;

    /// Persist a derived status. Missing rows are a `NotFound` error.
    async fn set_medicine_status(
        &self,
        medicine_id: DbId,
        status: MedicineStatus,
    ) -> Result<(), MonitorError>;

    /// ID of the open alert of `alert_type` for the medicine, if any.
    async fn find_open_alert(
        &self,
        medicine_id: DbId,
        alert_type: AlertType,
    ) -> Result<Option<DbId>, MonitorError>;

    /// Resolve every open alert of `alert_type` for the medicine, returning
    /// how many were resolved.
    async fn resolve_open_alerts(
        &self,
        medicine_id: DbId,
        alert_type: AlertType,
    ) -> Result<u64, MonitorError>;

    /// Insert an unresolved alert.
    async fn insert_alert(&self, alert: &NewAlert) -> Result<DbId, MonitorError>;

    /// ID of the open (`pending`/`ordered`) reorder for the medicine, if any.
    async fn find_open_reorder(&self, medicine_id: DbId) -> Result<Option<DbId>, MonitorError>;

    /// Insert a `pending` reorder.
    async fn insert_reorder(&self, reorder: &NewReorder) -> Result<DbId, MonitorError>;
}
