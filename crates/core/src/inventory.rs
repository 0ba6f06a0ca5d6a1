//! Inventory enums shared by the rules, the data layer, and the API.
//!
//! Every enum here is stored as `TEXT` in PostgreSQL (guarded by a `CHECK`
//! constraint), so each one round-trips through [`as_str`] and [`FromStr`].
//!
//! [`as_str`]: MedicineStatus::as_str

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Medicine status
// ---------------------------------------------------------------------------

/// Derived status of a medicine record. Transitions are owned by the
/// monitoring job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicineStatus {
    Active,
    Expired,
    LowStock,
    OutOfStock,
}

impl MedicineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::LowStock => "low_stock",
            Self::OutOfStock => "out_of_stock",
        }
    }
}

impl FromStr for MedicineStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "low_stock" => Ok(Self::LowStock),
            "out_of_stock" => Ok(Self::OutOfStock),
            other => Err(CoreError::Validation(format!(
                "Invalid medicine status '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Kind of alert. The pair `(medicine_id, AlertType)` is the dedup key for
/// open alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Expiry,
    LowStock,
    OutOfStock,
    Quality,
}

impl AlertType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expiry => "expiry",
            Self::LowStock => "low_stock",
            Self::OutOfStock => "out_of_stock",
            Self::Quality => "quality",
        }
    }
}

impl FromStr for AlertType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expiry" => Ok(Self::Expiry),
            "low_stock" => Ok(Self::LowStock),
            "out_of_stock" => Ok(Self::OutOfStock),
            "quality" => Ok(Self::Quality),
            other => Err(CoreError::Validation(format!(
                "Invalid alert type '{other}'"
            ))),
        }
    }
}

/// Alert severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl FromStr for AlertSeverity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(CoreError::Validation(format!(
                "Invalid alert severity '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Reorders
// ---------------------------------------------------------------------------

/// Fulfillment life cycle of a reorder.
///
/// ```text
/// pending -> ordered -> shipped -> delivered
///    |          |
///    +----------+-----> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderStatus {
    Pending,
    Ordered,
    Shipped,
    Delivered,
    Cancelled,
}

/// Statuses that count as an open reorder for dedup purposes.
pub const OPEN_REORDER_STATUSES: [ReorderStatus; 2] =
    [ReorderStatus::Pending, ReorderStatus::Ordered];

impl ReorderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ordered => "ordered",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether this reorder blocks the monitor from creating another one.
    pub fn is_open(self) -> bool {
        OPEN_REORDER_STATUSES.contains(&self)
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    pub fn can_transition_to(self, next: ReorderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Ordered)
                | (Self::Pending, Self::Cancelled)
                | (Self::Ordered, Self::Shipped)
                | (Self::Ordered, Self::Cancelled)
                | (Self::Shipped, Self::Delivered)
        )
    }

    /// Validate a status change requested by a fulfillment action.
    pub fn validate_transition(self, next: ReorderStatus) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else if self.is_terminal() {
            Err(CoreError::Validation(format!(
                "Reorder is already {} and cannot change status",
                self.as_str()
            )))
        } else {
            Err(CoreError::Validation(format!(
                "Cannot move reorder from {} to {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

impl FromStr for ReorderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "ordered" => Ok(Self::Ordered),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Invalid reorder status '{other}'"
            ))),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(MedicineStatus, AlertType, AlertSeverity, ReorderStatus);

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn statuses_parse_their_own_text() {
        for status in [
            MedicineStatus::Active,
            MedicineStatus::Expired,
            MedicineStatus::LowStock,
            MedicineStatus::OutOfStock,
        ] {
            assert_eq!(status.as_str().parse::<MedicineStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_alert_type_is_a_validation_error() {
        assert_matches!("recall".parse::<AlertType>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn severity_orders_by_urgency() {
        assert!(AlertSeverity::Critical > AlertSeverity::High);
        assert!(AlertSeverity::High > AlertSeverity::Medium);
        assert!(AlertSeverity::Medium > AlertSeverity::Low);
    }

    #[test]
    fn only_pending_and_ordered_are_open() {
        assert!(ReorderStatus::Pending.is_open());
        assert!(ReorderStatus::Ordered.is_open());
        assert!(!ReorderStatus::Shipped.is_open());
        assert!(!ReorderStatus::Delivered.is_open());
        assert!(!ReorderStatus::Cancelled.is_open());
    }

    #[test]
    fn reorder_follows_fulfillment_life_cycle() {
        assert!(ReorderStatus::Pending.can_transition_to(ReorderStatus::Ordered));
        assert!(ReorderStatus::Ordered.can_transition_to(ReorderStatus::Shipped));
        assert!(ReorderStatus::Shipped.can_transition_to(ReorderStatus::Delivered));
        assert!(ReorderStatus::Pending.can_transition_to(ReorderStatus::Cancelled));
        assert!(!ReorderStatus::Pending.can_transition_to(ReorderStatus::Delivered));
        assert!(!ReorderStatus::Shipped.can_transition_to(ReorderStatus::Cancelled));
    }

    #[test]
    fn terminal_reorders_reject_every_transition() {
        let err = ReorderStatus::Delivered
            .validate_transition(ReorderStatus::Pending)
            .unwrap_err();
        assert!(err.to_string().contains("already delivered"));
        assert_matches!(
            ReorderStatus::Cancelled.validate_transition(ReorderStatus::Ordered),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn serde_uses_snake_case_wire_names() {
        let json = serde_json::to_string(&MedicineStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out_of_stock\"");
        let json = serde_json::to_string(&AlertSeverity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
