//! Postgres enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vacation request status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "request_status")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting approvals.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Fully approved.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Vetoed by an approver.
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Enjoyed; days consumed.
    #[sea_orm(string_value = "taken")]
    Taken,
}

/// Approval record status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_status")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Slot created but not decided.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approver signed off.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Approver vetoed.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Employee role, as recorded on approval slots and policy entries.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approver_role")]
#[serde(rename_all = "lowercase")]
pub enum ApproverRole {
    /// Regular employee.
    #[sea_orm(string_value = "employee")]
    Employee,
    /// Team leader.
    #[sea_orm(string_value = "leader")]
    Leader,
    /// Human resources.
    #[sea_orm(string_value = "hr")]
    Hr,
    /// Administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
}
