//! Monitoring run orchestrator.
//!
//! A run loads one snapshot of the medicine table and walks it four times,
//! in a fixed order:
//!
//! 1. expired        -> status `expired` + critical `expiry` alert, which
//!                      supersedes an open expiry warning
//! 2. stock level    -> status `low_stock`/`out_of_stock` + stock alert, or
//!                      back to `active` once restocked
//! 3. expiring soon  -> `expiry` warning alert
//! 4. critical stock -> `pending` reorder
//!
//! Status changes made by a pass are written to the store and to the
//! snapshot, so later passes see them without re-querying. Fatal store
//! errors abort the run; other write failures skip the medicine.

use std::sync::Arc;

use medchain_core::inventory::MedicineStatus;
use medchain_core::monitoring::{self, MedicineSnapshot, MonitorThresholds, StatusDecision};
use medchain_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::MonitorError;
use crate::store::InventoryStore;
use crate::writers::{AlertWriter, ReorderWriter};

/// Counts of medicines matched by each pass of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub expired: u32,
    pub low_stock: u32,
    pub expiring_soon: u32,
    pub critical_stock: u32,
    /// Medicines skipped because a write for them failed.
    pub failed: u32,
}

#[derive(Debug, Clone, Copy)]
enum Pass {
    Expired,
    LowStock,
    ExpiringSoon,
    CriticalStock,
}

impl Pass {
    fn as_str(self) -> &'static str {
        match self {
            Pass::Expired => "expired",
            Pass::LowStock => "low_stock",
            Pass::ExpiringSoon => "expiring_soon",
            Pass::CriticalStock => "critical_stock",
        }
    }
}

/// Runs the classification passes against an injected store.
pub struct Monitor {
    store: Arc<dyn InventoryStore>,
    thresholds: MonitorThresholds,
    alerts: AlertWriter,
    reorders: ReorderWriter,
    /// Serializes runs within this process.
    run_lock: Mutex<()>,
}

impl Monitor {
    pub fn new(store: Arc<dyn InventoryStore>, thresholds: MonitorThresholds) -> Self {
        Self {
            alerts: AlertWriter::new(Arc::clone(&store)),
            reorders: ReorderWriter::new(Arc::clone(&store)),
            store,
            thresholds,
            run_lock: Mutex::new(()),
        }
    }

    pub fn thresholds(&self) -> &MonitorThresholds {
        &self.thresholds
    }

    /// Execute one full monitoring run as of `now`.
    ///
    /// Writes already applied when a fatal error occurs are not rolled back.
    pub async fn run_once(&self, now: Timestamp) -> Result<RunSummary, MonitorError> {
        let _guard = self.run_lock.lock().await;
        let today = now.date_naive();

        tracing::info!(%today, "Starting inventory monitoring run");

        let mut medicines = self.store.list_medicines().await?;
        let mut summary = RunSummary::default();

        summary.expired = self.expired_pass(&mut medicines, today, &mut summary.failed).await?;
        summary.low_stock = self.stock_pass(&mut medicines, &mut summary.failed).await?;
        summary.expiring_soon = self
            .expiring_soon_pass(&medicines, today, &mut summary.failed)
            .await?;
        summary.critical_stock = self
            .reorder_pass(&medicines, today, &mut summary.failed)
            .await?;

        tracing::info!(
            scanned = medicines.len(),
            expired = summary.expired,
            low_stock = summary.low_stock,
            expiring_soon = summary.expiring_soon,
            critical_stock = summary.critical_stock,
            failed = summary.failed,
            "Inventory monitoring run completed"
        );

        Ok(summary)
    }

    async fn expired_pass(
        &self,
        medicines: &mut [MedicineSnapshot],
        today: Date,
        failed: &mut u32,
    ) -> Result<u32, MonitorError> {
        let mut matched = 0;
        for medicine in medicines.iter_mut() {
            let Some(decision) = monitoring::check_expired(medicine, today) else {
                continue;
            };
            matched += 1;
            let result = self.apply_status(medicine, decision).await;
            absorb(Pass::Expired, medicine.id, result, failed)?;
        }
        log_pass(Pass::Expired, matched);
        Ok(matched)
    }

    async fn stock_pass(
        &self,
        medicines: &mut [MedicineSnapshot],
        failed: &mut u32,
    ) -> Result<u32, MonitorError> {
        let mut matched = 0;
        for medicine in medicines.iter_mut() {
            if let Some(status) = monitoring::check_restocked(medicine, &self.thresholds) {
                let result = self.restore_status(medicine, status).await;
                absorb(Pass::LowStock, medicine.id, result, failed)?;
                continue;
            }
            let Some(decision) = monitoring::check_stock(medicine, &self.thresholds) else {
                continue;
            };
            matched += 1;
            let result = self.apply_status(medicine, decision).await;
            absorb(Pass::LowStock, medicine.id, result, failed)?;
        }
        log_pass(Pass::LowStock, matched);
        Ok(matched)
    }

    async fn expiring_soon_pass(
        &self,
        medicines: &[MedicineSnapshot],
        today: Date,
        failed: &mut u32,
    ) -> Result<u32, MonitorError> {
        let mut matched = 0;
        for medicine in medicines {
            let Some(alert) = monitoring::check_expiring_soon(medicine, today, &self.thresholds)
            else {
                continue;
            };
            matched += 1;
            let result = self.alerts.raise(medicine.id, &alert).await.map(drop);
            absorb(Pass::ExpiringSoon, medicine.id, result, failed)?;
        }
        log_pass(Pass::ExpiringSoon, matched);
        Ok(matched)
    }

    async fn reorder_pass(
        &self,
        medicines: &[MedicineSnapshot],
        today: Date,
        failed: &mut u32,
    ) -> Result<u32, MonitorError> {
        let mut matched = 0;
        for medicine in medicines {
            let Some(proposal) =
                monitoring::check_critical_reorder(medicine, today, &self.thresholds)
            else {
                continue;
            };
            matched += 1;
            let result = self
                .reorders
                .ensure_reorder(
                    medicine.id,
                    proposal.quantity,
                    Some(proposal.supplier),
                    Some(proposal.expected_delivery),
                )
                .await
                .map(drop);
            absorb(Pass::CriticalStock, medicine.id, result, failed)?;
        }
        log_pass(Pass::CriticalStock, matched);
        Ok(matched)
    }

    /// Persist a status change, mirror it into the snapshot, then raise the
    /// accompanying alert.
    async fn apply_status(
        &self,
        medicine: &mut MedicineSnapshot,
        decision: StatusDecision,
    ) -> Result<(), MonitorError> {
        if medicine.status != decision.new_status {
            self.store
                .set_medicine_status(medicine.id, decision.new_status)
                .await?;
            tracing::debug!(
                medicine_id = medicine.id,
                from = %medicine.status,
                to = %decision.new_status,
                "Medicine status changed"
            );
            medicine.status = decision.new_status;
        }

        self.alerts.raise(medicine.id, &decision.alert).await?;
        Ok(())
    }

    /// Return a restocked medicine to `status` without raising an alert.
    async fn restore_status(
        &self,
        medicine: &mut MedicineSnapshot,
        status: MedicineStatus,
    ) -> Result<(), MonitorError> {
        self.store.set_medicine_status(medicine.id, status).await?;
        tracing::info!(
            medicine_id = medicine.id,
            from = %medicine.status,
            to = %status,
            quantity = medicine.quantity,
            "Medicine restocked"
        );
        medicine.status = status;
        Ok(())
    }
}

/// Turn a per-medicine failure into a skip unless it is fatal.
fn absorb(
    pass: Pass,
    medicine_id: DbId,
    result: Result<(), MonitorError>,
    failed: &mut u32,
) -> Result<(), MonitorError> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => {
            tracing::error!(pass = pass.as_str(), medicine_id, error = %e, "Aborting monitoring run");
            Err(e)
        }
        Err(e) => {
            tracing::warn!(pass = pass.as_str(), medicine_id, error = %e, "Skipping medicine");
            *failed += 1;
            Ok(())
        }
    }
}

fn log_pass(pass: Pass, matched: u32) {
    if matched > 0 {
        tracing::info!(pass = pass.as_str(), matched, "Monitoring pass matched medicines");
    } else {
        tracing::debug!(pass = pass.as_str(), "Monitoring pass matched nothing");
    }
}
