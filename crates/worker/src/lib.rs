//! MedChain inventory monitoring engine.
//!
//! - [`Monitor`]: runs the four ordered checks over a medicine snapshot and
//!   returns a [`RunSummary`].
//! - [`AlertWriter`] / [`ReorderWriter`]: lookup-then-insert writers that
//!   keep at most one open alert per `(medicine, type)` and one open reorder
//!   per medicine.
//! - [`InventoryStore`]: the storage seam, with a PostgreSQL implementation
//!   and an in-memory one for tests.
//! - [`MonitorScheduler`]: fixed-interval background loop.

pub mod config;
pub mod error;
pub mod monitor;
pub mod scheduler;
pub mod store;
pub mod writers;

pub use config::MonitorConfig;
pub use error::MonitorError;
pub use monitor::{Monitor, RunSummary};
pub use scheduler::MonitorScheduler;
pub use store::{InventoryStore, MemoryInventoryStore, PgInventoryStore};
pub use writers::{AlertWriter, Ensured, ReorderWriter};
