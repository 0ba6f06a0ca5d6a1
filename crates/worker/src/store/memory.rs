use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use medchain_core::error::CoreError;
use medchain_core::inventory::{AlertSeverity, AlertType, MedicineStatus, ReorderStatus};
use medchain_core::monitoring::MedicineSnapshot;
use medchain_core::types::{Date, DbId};
use medchain_db::models::alert::NewAlert;
use medchain_db::models::reorder::NewReorder;

use super::InventoryStore;
use crate::error::MonitorError;

/// An alert row held by [`MemoryInventoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAlert {
    pub id: DbId,
    pub medicine_id: DbId,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub is_resolved: bool,
}

/// A reorder row held by [`MemoryInventoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReorder {
    pub id: DbId,
    pub medicine_id: DbId,
    pub quantity: i32,
    pub status: ReorderStatus,
    pub supplier: Option<String>,
    pub expected_delivery: Option<Date>,
}

#[derive(Debug, Default)]
struct State {
    medicines: BTreeMap<DbId, MedicineSnapshot>,
    alerts: Vec<StoredAlert>,
    reorders: Vec<StoredReorder>,
    next_id: DbId,
    failing_medicines: HashSet<DbId>,
    unavailable: bool,
    writes_until_unavailable: Option<usize>,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn check_available(&self) -> Result<(), MonitorError> {
        if self.unavailable {
            return Err(MonitorError::Unavailable("connection refused".into()));
        }
        Ok(())
    }

    /// Gate for every write: connectivity first, then per-record faults.
    fn check_write(&mut self, medicine_id: DbId) -> Result<(), MonitorError> {
        self.check_available()?;
        if let Some(remaining) = self.writes_until_unavailable.as_mut() {
            if *remaining == 0 {
                self.unavailable = true;
                return self.check_available();
            }
            *remaining -= 1;
        }
        if self.failing_medicines.contains(&medicine_id) {
            return Err(CoreError::Internal(format!(
                "write rejected for medicine {medicine_id}"
            ))
            .into());
        }
        Ok(())
    }
}

/// In-memory [`InventoryStore`] with the same uniqueness guarantees as the
/// PostgreSQL schema, plus fault injection for tests.
#[derive(Debug, Default)]
pub struct MemoryInventoryStore {
    state: Mutex<State>,
}

impl MemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-loaded with medicines.
    pub fn with_medicines(medicines: impl IntoIterator<Item = MedicineSnapshot>) -> Self {
        let store = Self::new();
        for medicine in medicines {
            store.put_medicine(medicine);
        }
        store
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace a medicine, as a user edit would.
    pub fn put_medicine(&self, medicine: MedicineSnapshot) {
        self.state().medicines.insert(medicine.id, medicine);
    }

    pub fn medicine(&self, id: DbId) -> Option<MedicineSnapshot> {
        self.state().medicines.get(&id).cloned()
    }

    pub fn alerts(&self) -> Vec<StoredAlert> {
        self.state().alerts.clone()
    }

    pub fn alerts_for(&self, medicine_id: DbId) -> Vec<StoredAlert> {
        self.state()
            .alerts
            .iter()
            .filter(|a| a.medicine_id == medicine_id)
            .cloned()
            .collect()
    }

    pub fn reorders(&self) -> Vec<StoredReorder> {
        self.state().reorders.clone()
    }

    pub fn reorders_for(&self, medicine_id: DbId) -> Vec<StoredReorder> {
        self.state()
            .reorders
            .iter()
            .filter(|r| r.medicine_id == medicine_id)
            .cloned()
            .collect()
    }

    /// Resolve an alert as a user would. Returns `false` if it was not open.
    pub fn resolve_alert(&self, id: DbId) -> bool {
        let mut state = self.state();
        match state.alerts.iter_mut().find(|a| a.id == id && !a.is_resolved) {
            Some(alert) => {
                alert.is_resolved = true;
                true
            }
            None => false,
        }
    }

    /// Force a reorder into `status`, as a fulfillment event would.
    pub fn set_reorder_status(&self, id: DbId, status: ReorderStatus) -> bool {
        let mut state = self.state();
        match state.reorders.iter_mut().find(|r| r.id == id) {
            Some(reorder) => {
                reorder.status = status;
                true
            }
            None => false,
        }
    }

    /// Make every write touching `medicine_id` fail with a non-fatal error.
    pub fn fail_writes_for(&self, medicine_id: DbId) {
        self.state().failing_medicines.insert(medicine_id);
    }

    /// Make every operation fail as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Allow `writes` more successful writes, then become unavailable.
    pub fn go_unavailable_after(&self, writes: usize) {
        self.state().writes_until_unavailable = Some(writes);
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn list_medicines(&self) -> Result<Vec<MedicineSnapshot>, MonitorError> {
        let state = self.state();
        state.check_available()?;
        Ok(state.medicines.values().cloned().collect())
    }

    async fn set_medicine_status(
        &self,
        medicine_id: DbId,
        status: MedicineStatus,
    ) -> Result<(), MonitorError> {
        let mut state = self.state();
        state.check_write(medicine_id)?;
        match state.medicines.get_mut(&medicine_id) {
            Some(medicine) => {
                medicine.status = status;
                Ok(())
            }
            None => Err(CoreError::NotFound {
                entity: "Medicine",
                id: medicine_id,
            }
            .into()),
        }
    }

    async fn find_open_alert(
        &self,
        medicine_id: DbId,
        alert_type: AlertType,
    ) -> Result<Option<DbId>, MonitorError> {
        let state = self.state();
        state.check_available()?;
        Ok(state
            .alerts
            .iter()
            .find(|a| a.medicine_id == medicine_id && a.alert_type == alert_type && !a.is_resolved)
            .map(|a| a.id))
    }

    async fn resolve_open_alerts(
        &self,
        medicine_id: DbId,
        alert_type: AlertType,
    ) -> Result<u64, MonitorError> {
        let mut state = self.state();
        state.check_write(medicine_id)?;
        let mut resolved = 0;
        for alert in state.alerts.iter_mut().filter(|a| {
            a.medicine_id == medicine_id && a.alert_type == alert_type && !a.is_resolved
        }) {
            alert.is_resolved = true;
            resolved += 1;
        }
        Ok(resolved)
    }

    async fn insert_alert(&self, alert: &NewAlert) -> Result<DbId, MonitorError> {
        let mut state = self.state();
        state.check_write(alert.medicine_id)?;

        let duplicate = state.alerts.iter().any(|a| {
            a.medicine_id == alert.medicine_id && a.alert_type == alert.alert_type && !a.is_resolved
        });
        if duplicate {
            return Err(CoreError::Conflict(format!(
                "open {} alert already exists for medicine {}",
                alert.alert_type, alert.medicine_id
            ))
            .into());
        }

        let id = state.next_id();
        state.alerts.push(StoredAlert {
            id,
            medicine_id: alert.medicine_id,
            alert_type: alert.alert_type,
            severity: alert.severity,
            message: alert.message.clone(),
            is_resolved: false,
        });
        Ok(id)
    }

    async fn find_open_reorder(&self, medicine_id: DbId) -> Result<Option<DbId>, MonitorError> {
        let state = self.state();
        state.check_available()?;
        Ok(state
            .reorders
            .iter()
            .find(|r| r.medicine_id == medicine_id && r.status.is_open())
            .map(|r| r.id))
    }

    async fn insert_reorder(&self, reorder: &NewReorder) -> Result<DbId, MonitorError> {
        let mut state = self.state();
        state.check_write(reorder.medicine_id)?;

        let duplicate = state
            .reorders
            .iter()
            .any(|r| r.medicine_id == reorder.medicine_id && r.status.is_open());
        if duplicate {
            return Err(CoreError::Conflict(format!(
                "open reorder already exists for medicine {}",
                reorder.medicine_id
            ))
            .into());
        }

        let id = state.next_id();
        state.reorders.push(StoredReorder {
            id,
            medicine_id: reorder.medicine_id,
            quantity: reorder.quantity,
            status: ReorderStatus::Pending,
            supplier: reorder.supplier.clone(),
            expected_delivery: reorder.expected_delivery,
        });
        Ok(id)
    }
}
