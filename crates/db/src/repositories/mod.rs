//! Repository structs for the inventory tables.
//!
//! Each repository is a zero-sized struct with associated async functions
//! that take a `&PgPool` as the first argument.

pub mod alert_repo;
pub mod medicine_repo;
pub mod reorder_repo;
pub mod report_repo;

pub use alert_repo::AlertRepo;
pub use medicine_repo::MedicineRepo;
pub use reorder_repo::ReorderRepo;
pub use report_repo::ReportRepo;
