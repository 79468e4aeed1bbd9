//! `SeaORM` Entity for the vacation_approvals table.
//!
//! One row per (request, role): a role slot is filled once.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ApprovalStatus, ApproverRole};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "vacation_approvals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub request_id: Uuid,
    /// The approver.
    pub employee_id: Uuid,
    /// The approver's role at decision time.
    pub role: ApproverRole,
    pub status: ApprovalStatus,
    pub decided_at: Option<DateTimeWithTimeZone>,
    pub comment: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vacation_requests::Entity",
        from = "Column::RequestId",
        to = "super::vacation_requests::Column::Id"
    )]
    VacationRequests,
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id"
    )]
    Employees,
}

impl Related<super::vacation_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VacationRequests.def()
    }
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
