#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use medchain_core::inventory::MedicineStatus;
use medchain_core::monitoring::{MedicineSnapshot, MonitorThresholds};
use medchain_core::types::{DbId, Timestamp};
use medchain_worker::{MemoryInventoryStore, Monitor};

/// Noon UTC on the fixed "today" used across the tests.
pub fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

/// A date `days` away from today (negative for the past).
pub fn in_days(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub fn medicine(
    id: DbId,
    quantity: i32,
    expiry_date: NaiveDate,
    status: MedicineStatus,
) -> MedicineSnapshot {
    MedicineSnapshot {
        id,
        name: format!("Medicine {id}"),
        batch_id: format!("BATCH-{id:03}"),
        manufacturer: "PharmaCorp Ltd".to_string(),
        quantity,
        expiry_date,
        location: "Rural Clinic A".to_string(),
        status,
    }
}

/// A healthy record: plenty of stock, expiry far away.
pub fn healthy(id: DbId) -> MedicineSnapshot {
    medicine(id, 1_000, in_days(365), MedicineStatus::Active)
}

/// Store + monitor pair with default thresholds.
pub fn setup(
    medicines: impl IntoIterator<Item = MedicineSnapshot>,
) -> (Arc<MemoryInventoryStore>, Monitor) {
    let store = Arc::new(MemoryInventoryStore::with_medicines(medicines));
    let monitor = Monitor::new(store.clone(), MonitorThresholds::default());
    (store, monitor)
}
