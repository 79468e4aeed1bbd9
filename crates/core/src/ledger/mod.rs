//! Per-employee-year vacation day accounting.
//!
//! Entitlement accrues from tenure on a 360-day commercial year: one
//! vacation day for every 24 worked days. The balance row reconciles
//! entitlement against days scheduled (approved requests) and days used
//! (taken requests).
//!
//! # Modules
//!
//! - `tenure` - 360-day-year date arithmetic and accrual
//! - `types` - The balance snapshot and its canonical formula

pub mod tenure;
pub mod types;

pub use types::BalanceSnapshot;
