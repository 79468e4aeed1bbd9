//! `SeaORM` Entity for the vacation_balances table.
//!
//! One row per (employee, year), created lazily on first access.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "vacation_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub year: i32,
    /// Tenure on the 360-day commercial year.
    pub worked_days: i32,
    /// Accrued entitlement: worked_days / 24.
    pub days_to_enjoy: i32,
    /// Sum over approved requests.
    pub days_scheduled: i32,
    /// Sum over taken requests.
    pub used_days: i32,
    /// days_to_enjoy - used_days - days_scheduled.
    pub days_available: i32,
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
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
