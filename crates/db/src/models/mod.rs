pub mod alert;
pub mod medicine;
pub mod reorder;
pub mod report;
