//! `SeaORM` Entity for the employees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub document_number: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub country_id: Uuid,
    /// Direct manager; approvals by leaders are restricted to their reports.
    pub lead_id: Option<Uuid>,
    pub hire_date: Option<Date>,
    /// Custom work-week mask override; NULL or all-false falls back to the
    /// country default.
    pub working_days: Option<Json>,
    pub is_employee: bool,
    pub is_leader: bool,
    pub is_hr: bool,
    pub is_admin: bool,
    /// Soft-deactivation flag; employees are never hard-deleted.
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::countries::Entity",
        from = "Column::CountryId",
        to = "super::countries::Column::Id"
    )]
    Countries,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::LeadId",
        to = "Column::Id"
    )]
    Lead,
    #[sea_orm(has_many = "super::vacation_requests::Entity")]
    VacationRequests,
    #[sea_orm(has_many = "super::vacation_balances::Entity")]
    VacationBalances,
}

impl Related<super::countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Countries.def()
    }
}

impl Related<super::vacation_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VacationRequests.def()
    }
}

impl Related<super::vacation_balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VacationBalances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
