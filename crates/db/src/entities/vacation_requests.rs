//! `SeaORM` Entity for the vacation_requests table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RequestStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "vacation_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    /// Derived working-day count, never user-supplied.
    pub days_requested: i32,
    pub status: RequestStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejected_reason: Option<String>,
    /// Company tag copied from the employee at creation.
    pub company: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id"
    )]
    Employees,
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::ApprovedBy",
        to = "super::employees::Column::Id"
    )]
    Approver,
    #[sea_orm(has_many = "super::vacation_approvals::Entity")]
    VacationApprovals,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl Related<super::vacation_approvals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VacationApprovals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
