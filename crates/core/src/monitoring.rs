//! Classification rules for the periodic inventory monitor.
//!
//! Each check is a pure function of a [`MedicineSnapshot`], the current date,
//! and [`MonitorThresholds`]. The orchestrator in `medchain-worker` runs them
//! in a fixed order (expired, stock level, expiring soon, critical reorder)
//! and threads status changes from one check into the next.
//!
//! Precedence when several conditions hold at once is
//! expired > out of stock > low stock: the stock check never touches a
//! medicine that is already expired.
//!
//! Stock status is re-derived on every run, so a restocked medicine moves
//! back from `out_of_stock` to `low_stock` or `active`. An `expired`
//! medicine stays expired.

use chrono::Duration;
use serde::Serialize;

use crate::error::CoreError;
use crate::inventory::{AlertSeverity, AlertType, MedicineStatus};
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Quantity below which a medicine is considered low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 50;

/// Quantity below which stock is critical (high severity, auto-reorder).
pub const DEFAULT_CRITICAL_STOCK_THRESHOLD: i32 = 10;

/// How far ahead (in days) an upcoming expiry raises a warning.
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;

/// Days remaining at or below which an expiry warning is high severity.
pub const DEFAULT_URGENT_EXPIRY_DAYS: i64 = 7;

/// Smallest quantity the monitor will ever reorder.
pub const DEFAULT_MIN_REORDER_QUANTITY: i32 = 500;

/// Reorder size as a multiple of the remaining quantity.
pub const DEFAULT_REORDER_MULTIPLIER: i32 = 10;

/// Expected supplier lead time in days.
pub const DEFAULT_REORDER_LEAD_DAYS: i64 = 7;

/// Upper bound for any day-count threshold (ten years).
pub const MAX_THRESHOLD_DAYS: i64 = 3650;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Tunable limits used by the classification rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorThresholds {
    pub low_stock: i32,
    pub critical_stock: i32,
    pub expiry_warning_days: i64,
    pub urgent_expiry_days: i64,
    pub min_reorder_quantity: i32,
    pub reorder_multiplier: i32,
    pub reorder_lead_days: i64,
}

impl Default for MonitorThresholds {
    fn default() -> Self {
        Self {
            low_stock: DEFAULT_LOW_STOCK_THRESHOLD,
            critical_stock: DEFAULT_CRITICAL_STOCK_THRESHOLD,
            expiry_warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
            urgent_expiry_days: DEFAULT_URGENT_EXPIRY_DAYS,
            min_reorder_quantity: DEFAULT_MIN_REORDER_QUANTITY,
            reorder_multiplier: DEFAULT_REORDER_MULTIPLIER,
            reorder_lead_days: DEFAULT_REORDER_LEAD_DAYS,
        }
    }
}

impl MonitorThresholds {
    /// Reject combinations the rules cannot work with: a zero-sized
    /// reorder, a critical band above the low-stock band, or day counts
    /// large enough to overflow date arithmetic.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.low_stock < 1 {
            return Err(invalid("low_stock must be at least 1"));
        }
        if !(0..=self.low_stock).contains(&self.critical_stock) {
            return Err(invalid("critical_stock must be between 0 and low_stock"));
        }
        if !(0..=MAX_THRESHOLD_DAYS).contains(&self.expiry_warning_days) {
            return Err(invalid(format!(
                "expiry_warning_days must be between 0 and {MAX_THRESHOLD_DAYS}"
            )));
        }
        if !(0..=self.expiry_warning_days).contains(&self.urgent_expiry_days) {
            return Err(invalid(
                "urgent_expiry_days must be between 0 and expiry_warning_days",
            ));
        }
        if self.min_reorder_quantity < 1 {
            return Err(invalid("min_reorder_quantity must be at least 1"));
        }
        if self.reorder_multiplier < 0 {
            return Err(invalid("reorder_multiplier must not be negative"));
        }
        if !(0..=MAX_THRESHOLD_DAYS).contains(&self.reorder_lead_days) {
            return Err(invalid(format!(
                "reorder_lead_days must be between 0 and {MAX_THRESHOLD_DAYS}"
            )));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::Validation(msg.into())
}

/// The fields of a medicine record the rules read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicineSnapshot {
    pub id: DbId,
    pub name: String,
    pub batch_id: String,
    pub manufacturer: String,
    pub quantity: i32,
    pub expiry_date: Date,
    pub location: String,
    pub status: MedicineStatus,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// How the alert writer decides whether a proposed alert is new.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "key")]
pub enum AlertDedup {
    /// Skip if an open alert of the proposal's own type exists.
    SameType,
    /// Skip if an open alert of the given type exists.
    Key(AlertType),
    /// Resolve open alerts of the proposal's type, then raise this one.
    Supersede,
}

/// An alert a rule wants raised. Whether it is actually inserted is up to
/// the idempotent alert writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertProposal {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub dedup: AlertDedup,
}

/// A status change together with the alert that accompanies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDecision {
    pub new_status: MedicineStatus,
    pub alert: AlertProposal,
}

/// A purchase order a rule wants created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderProposal {
    pub quantity: i32,
    pub supplier: String,
    pub expected_delivery: Date,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Expired check: the expiry date has been reached and the medicine is not
/// yet marked expired.
pub fn check_expired(medicine: &MedicineSnapshot, today: Date) -> Option<StatusDecision> {
    if medicine.status == MedicineStatus::Expired || medicine.expiry_date > today {
        return None;
    }

    Some(StatusDecision {
        new_status: MedicineStatus::Expired,
        alert: AlertProposal {
            alert_type: AlertType::Expiry,
            severity: AlertSeverity::Critical,
            message: format!(
                "{} (Batch: {}) has expired",
                medicine.name, medicine.batch_id
            ),
            // Replaces any open expiring-soon warning.
            dedup: AlertDedup::Supersede,
        },
    })
}

/// Low/out-of-stock check.
///
/// Skips medicines still out of stock at zero units (nothing left to
/// escalate) and medicines already expired (expiry takes precedence). Both
/// outcomes are deduplicated against an open `low_stock` alert.
pub fn check_stock(
    medicine: &MedicineSnapshot,
    thresholds: &MonitorThresholds,
) -> Option<StatusDecision> {
    let still_empty = medicine.status == MedicineStatus::OutOfStock && medicine.quantity == 0;
    if medicine.status == MedicineStatus::Expired
        || still_empty
        || medicine.quantity >= thresholds.low_stock
    {
        return None;
    }

    let (new_status, alert_type, state) = if medicine.quantity == 0 {
        (
            MedicineStatus::OutOfStock,
            AlertType::OutOfStock,
            "out of stock",
        )
    } else {
        (MedicineStatus::LowStock, AlertType::LowStock, "running low")
    };

    Some(StatusDecision {
        new_status,
        alert: AlertProposal {
            alert_type,
            severity: stock_severity(medicine.quantity, thresholds),
            message: format!(
                "{} at {} is {} ({} units remaining)",
                medicine.name, medicine.location, state, medicine.quantity
            ),
            dedup: AlertDedup::Key(AlertType::LowStock),
        },
    })
}

/// Restock check: a `low_stock` or `out_of_stock` medicine whose quantity
/// is back at or above the low-stock threshold returns to `active`.
pub fn check_restocked(
    medicine: &MedicineSnapshot,
    thresholds: &MonitorThresholds,
) -> Option<MedicineStatus> {
    let short = matches!(
        medicine.status,
        MedicineStatus::LowStock | MedicineStatus::OutOfStock
    );
    (short && medicine.quantity >= thresholds.low_stock).then_some(MedicineStatus::Active)
}

/// Severity of a stock alert for the given remaining quantity.
pub fn stock_severity(quantity: i32, thresholds: &MonitorThresholds) -> AlertSeverity {
    if quantity == 0 {
        AlertSeverity::Critical
    } else if quantity < thresholds.critical_stock {
        AlertSeverity::High
    } else {
        AlertSeverity::Medium
    }
}

/// Expiring-soon check: expiry falls within `[today, today + warning window]`.
pub fn check_expiring_soon(
    medicine: &MedicineSnapshot,
    today: Date,
    thresholds: &MonitorThresholds,
) -> Option<AlertProposal> {
    if medicine.status == MedicineStatus::Expired {
        return None;
    }

    let days = days_until(medicine.expiry_date, today);
    if !(0..=thresholds.expiry_warning_days).contains(&days) {
        return None;
    }

    let severity = if days <= thresholds.urgent_expiry_days {
        AlertSeverity::High
    } else {
        AlertSeverity::Medium
    };

    Some(AlertProposal {
        alert_type: AlertType::Expiry,
        severity,
        message: format!(
            "{} (Batch: {}) will expire in {} days",
            medicine.name, medicine.batch_id, days
        ),
        dedup: AlertDedup::SameType,
    })
}

/// Whole days from `today` until `expiry`. Negative once expired.
pub fn days_until(expiry: Date, today: Date) -> i64 {
    (expiry - today).num_days()
}

/// Auto-reorder check: low stock inside the critical band.
///
/// Out-of-stock medicines are deliberately not reordered here; only the
/// `low_stock` status qualifies.
pub fn check_critical_reorder(
    medicine: &MedicineSnapshot,
    today: Date,
    thresholds: &MonitorThresholds,
) -> Option<ReorderProposal> {
    if medicine.status != MedicineStatus::LowStock
        || medicine.quantity >= thresholds.critical_stock
    {
        return None;
    }

    Some(ReorderProposal {
        quantity: reorder_quantity(medicine.quantity, thresholds),
        supplier: medicine.manufacturer.clone(),
        expected_delivery: today + Duration::days(thresholds.reorder_lead_days),
    })
}

/// `max(min_reorder_quantity, quantity * reorder_multiplier)`.
pub fn reorder_quantity(quantity: i32, thresholds: &MonitorThresholds) -> i32 {
    quantity
        .saturating_mul(thresholds.reorder_multiplier)
        .max(thresholds.min_reorder_quantity)
}
