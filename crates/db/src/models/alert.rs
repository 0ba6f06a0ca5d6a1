//! Alert entity model and DTOs.

use medchain_core::inventory::{AlertSeverity, AlertType};
use medchain_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub alert_type: String,
    pub medicine_id: DbId,
    pub message: String,
    pub severity: String,
    pub is_resolved: bool,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

/// Insert payload for a new (unresolved) alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    pub medicine_id: DbId,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
}
