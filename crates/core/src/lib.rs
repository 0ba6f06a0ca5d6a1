//! Domain types and pure rules for the MedChain inventory monitor.
//!
//! Nothing in this crate touches the database or the network; the rule
//! functions in [`monitoring`] take a snapshot and a date and return a
//! decision, so they are unit-tested directly.

pub mod error;
pub mod inventory;
pub mod monitoring;
pub mod types;
