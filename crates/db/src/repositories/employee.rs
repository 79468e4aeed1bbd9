//! Employee repository.
//!
//! Employees are soft-deactivated, never deleted, so requests and
//! approvals keep their referential history.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use thiserror::Error;
use uuid::Uuid;

use feriado_core::calendar::WorkWeek;
use feriado_core::workflow::{Role, RoleSet};

use crate::entities::employees;
use crate::repositories::country::workweek_to_json;

/// Employee repository errors.
#[derive(Debug, Error)]
pub enum EmployeeError {
    /// Employee not found (or deactivated where an active one is required).
    #[error("Employee {0} not found")]
    NotFound(Uuid),

    /// Document number already registered.
    #[error("Document number already in use: {0}")]
    DuplicateDocument(String),

    /// Email already registered.
    #[error("Email already in use: {0}")]
    DuplicateEmail(String),

    /// Every employee must hold at least one role.
    #[error("Employee must hold at least one role")]
    NoRoles,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Input for creating an employee.
#[derive(Debug, Clone)]
pub struct CreateEmployeeInput {
    /// National document number, unique.
    pub document_number: String,
    /// Full name.
    pub name: String,
    /// Email, unique.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Company tag, copied onto requests at creation.
    pub company: Option<String>,
    /// Country the employee belongs to.
    pub country_id: Uuid,
    /// Direct manager.
    pub lead_id: Option<Uuid>,
    /// Hire date; tenure and entitlement derive from it.
    pub hire_date: Option<NaiveDate>,
    /// Custom work-week override.
    pub working_days: Option<WorkWeek>,
    /// Role set; must not be empty.
    pub roles: RoleSet,
}

/// Input for updating an employee.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployeeInput {
    /// New name.
    pub name: Option<String>,
    /// New phone.
    pub phone: Option<Option<String>>,
    /// New company tag.
    pub company: Option<Option<String>>,
    /// New direct manager.
    pub lead_id: Option<Option<Uuid>>,
    /// New hire date.
    pub hire_date: Option<Option<NaiveDate>>,
    /// New custom work-week override (`Some(None)` clears it).
    pub working_days: Option<Option<WorkWeek>>,
    /// New role set; must not be empty when provided.
    pub roles: Option<RoleSet>,
}

/// Employee repository.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an employee.
    ///
    /// # Errors
    ///
    /// Returns an error when the role set is empty, the document number or
    /// email is taken, or the database fails.
    pub async fn create(
        &self,
        input: CreateEmployeeInput,
    ) -> Result<employees::Model, EmployeeError> {
        if input.roles.is_empty() {
            return Err(EmployeeError::NoRoles);
        }

        let duplicate_document = employees::Entity::find()
            .filter(employees::Column::DocumentNumber.eq(&input.document_number))
            .one(&self.db)
            .await
            .map_err(|e| EmployeeError::Database(e.to_string()))?;
        if duplicate_document.is_some() {
            return Err(EmployeeError::DuplicateDocument(input.document_number));
        }

        let duplicate_email = employees::Entity::find()
            .filter(employees::Column::Email.eq(&input.email))
            .one(&self.db)
            .await
            .map_err(|e| EmployeeError::Database(e.to_string()))?;
        if duplicate_email.is_some() {
            return Err(EmployeeError::DuplicateEmail(input.email));
        }

        let now = Utc::now().into();
        let employee = employees::ActiveModel {
            id: Set(Uuid::now_v7()),
            document_number: Set(input.document_number),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            company: Set(input.company),
            country_id: Set(input.country_id),
            lead_id: Set(input.lead_id),
            hire_date: Set(input.hire_date),
            working_days: Set(input.working_days.map(workweek_to_json)),
            is_employee: Set(input.roles.contains(Role::Employee)),
            is_leader: Set(input.roles.contains(Role::Leader)),
            is_hr: Set(input.roles.contains(Role::Hr)),
            is_admin: Set(input.roles.contains(Role::Admin)),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        employee
            .insert(&self.db)
            .await
            .map_err(|e| EmployeeError::Database(e.to_string()))
    }

    /// Fetches an employee by id, active or not.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeError::NotFound` if no such employee exists.
    pub async fn get(&self, id: Uuid) -> Result<employees::Model, EmployeeError> {
        employees::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EmployeeError::Database(e.to_string()))?
            .ok_or(EmployeeError::NotFound(id))
    }

    /// Fetches an active employee by id.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeError::NotFound` for missing or deactivated rows.
    pub async fn get_active(&self, id: Uuid) -> Result<employees::Model, EmployeeError> {
        employees::Entity::find_by_id(id)
            .filter(employees::Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| EmployeeError::Database(e.to_string()))?
            .ok_or(EmployeeError::NotFound(id))
    }

    /// Lists employees ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<employees::Model>, EmployeeError> {
        let mut query = employees::Entity::find().order_by_asc(employees::Column::Name);
        if active_only {
            query = query.filter(employees::Column::Active.eq(true));
        }
        query
            .all(&self.db)
            .await
            .map_err(|e| EmployeeError::Database(e.to_string()))
    }

    /// Updates an employee's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee is missing, the new role set is
    /// empty, or the database fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateEmployeeInput,
    ) -> Result<employees::Model, EmployeeError> {
        let employee = self.get(id).await?;

        if let Some(roles) = &input.roles
            && roles.is_empty()
        {
            return Err(EmployeeError::NoRoles);
        }

        let mut active: employees::ActiveModel = employee.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(company) = input.company {
            active.company = Set(company);
        }
        if let Some(lead_id) = input.lead_id {
            active.lead_id = Set(lead_id);
        }
        if let Some(hire_date) = input.hire_date {
            active.hire_date = Set(hire_date);
        }
        if let Some(mask) = input.working_days {
            active.working_days = Set(mask.map(workweek_to_json));
        }
        if let Some(roles) = input.roles {
            active.is_employee = Set(roles.contains(Role::Employee));
            active.is_leader = Set(roles.contains(Role::Leader));
            active.is_hr = Set(roles.contains(Role::Hr));
            active.is_admin = Set(roles.contains(Role::Admin));
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| EmployeeError::Database(e.to_string()))
    }

    /// Soft-deactivates an employee. The row and its history remain.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee is missing or the database fails.
    pub async fn deactivate(&self, id: Uuid) -> Result<employees::Model, EmployeeError> {
        let employee = self.get(id).await?;

        let mut active: employees::ActiveModel = employee.into();
        active.active = Set(false);
        active.updated_at = Set(Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| EmployeeError::Database(e.to_string()))
    }
}

/// The role set held by an employee row.
#[must_use]
pub fn role_set(employee: &employees::Model) -> RoleSet {
    RoleSet::from_flags(
        employee.is_employee,
        employee.is_leader,
        employee.is_hr,
        employee.is_admin,
    )
}

/// The employee's custom work-week override, if the stored JSON decodes.
#[must_use]
pub fn custom_workweek(employee: &employees::Model) -> Option<WorkWeek> {
    employee
        .working_days
        .as_ref()
        .and_then(|json| serde_json::from_value(json.clone()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee_with_flags(leader: bool, hr: bool) -> employees::Model {
        employees::Model {
            id: Uuid::now_v7(),
            document_number: "123".into(),
            name: "Test".into(),
            email: "test@example.com".into(),
            phone: None,
            company: None,
            country_id: Uuid::now_v7(),
            lead_id: None,
            hire_date: None,
            working_days: None,
            is_employee: true,
            is_leader: leader,
            is_hr: hr,
            is_admin: false,
            active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_role_set_from_row() {
        let roles = role_set(&employee_with_flags(true, false));
        assert!(roles.contains(Role::Employee));
        assert!(roles.contains(Role::Leader));
        assert!(!roles.contains(Role::Hr));
    }

    #[test]
    fn test_custom_workweek_absent_for_null_column() {
        assert_eq!(custom_workweek(&employee_with_flags(false, false)), None);
    }

    #[test]
    fn test_custom_workweek_decodes_stored_mask() {
        let mut employee = employee_with_flags(false, true);
        let mask = WorkWeek {
            sunday: true,
            ..WorkWeek::MONDAY_TO_FRIDAY
        };
        employee.working_days = Some(workweek_to_json(mask));
        assert_eq!(custom_workweek(&employee), Some(mask));
    }
}
