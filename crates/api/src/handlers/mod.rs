pub mod alert;
pub mod inventory;
pub mod medicine;
pub mod monitor;
pub mod reorder;
