//! `SeaORM` entity definitions.

pub mod approval_policy_entries;
pub mod countries;
pub mod employees;
pub mod sea_orm_active_enums;
pub mod vacation_approvals;
pub mod vacation_balances;
pub mod vacation_requests;
