//! Idempotent alert and reorder writers.
//!
//! Both follow lookup-then-insert: if an open row already exists nothing is
//! written. The one exception is a superseding alert, which first resolves
//! the open alerts of its type and then inserts. The partial unique indexes in the schema close the window
//! between lookup and insert; losing that race is reported as
//! `created: false`, not as an error.

use std::sync::Arc;

use medchain_core::inventory::{AlertSeverity, AlertType};
use medchain_core::monitoring::{AlertDedup, AlertProposal};
use medchain_core::types::{Date, DbId};
use medchain_db::models::alert::NewAlert;
use medchain_db::models::reorder::NewReorder;
use serde::Serialize;

use crate::error::MonitorError;
use crate::store::InventoryStore;

/// Outcome of an idempotent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ensured {
    /// `true` if a new row was inserted by this call.
    pub created: bool,
}

impl Ensured {
    const CREATED: Self = Self { created: true };
    const EXISTING: Self = Self { created: false };
}

/// Keeps at most one open alert per `(medicine, alert type)`.
#[derive(Clone)]
pub struct AlertWriter {
    store: Arc<dyn InventoryStore>,
}

impl AlertWriter {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Raise a rule's alert according to its [`AlertDedup`] mode.
    pub async fn raise(
        &self,
        medicine_id: DbId,
        proposal: &AlertProposal,
    ) -> Result<Ensured, MonitorError> {
        let (alert_type, severity, message) =
            (proposal.alert_type, proposal.severity, proposal.message.as_str());
        match proposal.dedup {
            AlertDedup::SameType => {
                self.ensure_alert(medicine_id, alert_type, message, severity)
                    .await
            }
            AlertDedup::Key(key) => {
                self.ensure_alert_keyed(medicine_id, key, alert_type, message, severity)
                    .await
            }
            AlertDedup::Supersede => {
                self.supersede_alert(medicine_id, alert_type, message, severity)
                    .await
            }
        }
    }

    /// Insert an alert unless one of the same type is already open for the
    /// medicine. An existing alert is left untouched even if its message or
    /// severity differ.
    pub async fn ensure_alert(
        &self,
        medicine_id: DbId,
        alert_type: AlertType,
        message: &str,
        severity: AlertSeverity,
    ) -> Result<Ensured, MonitorError> {
        self.ensure_alert_keyed(medicine_id, alert_type, alert_type, message, severity)
            .await
    }

    /// Insert an alert of `alert_type` unless an open alert of type `key`
    /// exists for the medicine.
    pub async fn ensure_alert_keyed(
        &self,
        medicine_id: DbId,
        key: AlertType,
        alert_type: AlertType,
        message: &str,
        severity: AlertSeverity,
    ) -> Result<Ensured, MonitorError> {
        if let Some(existing) = self.store.find_open_alert(medicine_id, key).await? {
            tracing::debug!(
                medicine_id,
                alert_id = existing,
                alert_type = %key,
                "Open alert already exists"
            );
            return Ok(Ensured::EXISTING);
        }

        self.insert(medicine_id, alert_type, message, severity).await
    }

    /// Resolve the open alerts of `alert_type` for the medicine, then insert
    /// this one in their place.
    pub async fn supersede_alert(
        &self,
        medicine_id: DbId,
        alert_type: AlertType,
        message: &str,
        severity: AlertSeverity,
    ) -> Result<Ensured, MonitorError> {
        let resolved = self
            .store
            .resolve_open_alerts(medicine_id, alert_type)
            .await?;
        if resolved > 0 {
            tracing::debug!(medicine_id, resolved, alert_type = %alert_type, "Superseded open alerts");
        }
        self.insert(medicine_id, alert_type, message, severity).await
    }

    async fn insert(
        &self,
        medicine_id: DbId,
        alert_type: AlertType,
        message: &str,
        severity: AlertSeverity,
    ) -> Result<Ensured, MonitorError> {
        let alert = NewAlert {
            medicine_id,
            alert_type,
            severity,
            message: message.to_string(),
        };

        match self.store.insert_alert(&alert).await {
            Ok(alert_id) => {
                tracing::info!(
                    medicine_id,
                    alert_id,
                    alert_type = %alert_type,
                    severity = %severity,
                    "Alert raised"
                );
                Ok(Ensured::CREATED)
            }
            Err(e) if e.is_duplicate() => {
                tracing::debug!(medicine_id, alert_type = %alert_type, "Alert inserted concurrently");
                Ok(Ensured::EXISTING)
            }
            Err(e) => Err(e),
        }
    }
}

/// Keeps at most one open (`pending`/`ordered`) reorder per medicine.
#[derive(Clone)]
pub struct ReorderWriter {
    store: Arc<dyn InventoryStore>,
}

impl ReorderWriter {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Create a `pending` reorder unless the medicine already has an open one.
    pub async fn ensure_reorder(
        &self,
        medicine_id: DbId,
        quantity: i32,
        supplier: Option<String>,
        expected_delivery: Option<Date>,
    ) -> Result<Ensured, MonitorError> {
        if let Some(existing) = self.store.find_open_reorder(medicine_id).await? {
            tracing::debug!(medicine_id, reorder_id = existing, "Open reorder already exists");
            return Ok(Ensured::EXISTING);
        }

        let reorder = NewReorder {
            medicine_id,
            quantity,
            supplier,
            expected_delivery,
        };

        match self.store.insert_reorder(&reorder).await {
            Ok(reorder_id) => {
                tracing::info!(medicine_id, reorder_id, quantity, "Auto-reorder created");
                Ok(Ensured::CREATED)
            }
            Err(e) if e.is_duplicate() => {
                tracing::debug!(medicine_id, "Reorder inserted concurrently");
                Ok(Ensured::EXISTING)
            }
            Err(e) => Err(e),
        }
    }
}
