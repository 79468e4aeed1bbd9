//! Employee management routes (HR/admin).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use feriado_core::calendar::WorkWeek;
use feriado_core::workflow::{Role, RoleSet};
use feriado_db::entities::employees;
use feriado_db::repositories::employee::{
    custom_workweek, role_set, CreateEmployeeInput, EmployeeError, UpdateEmployeeInput,
};
use feriado_db::EmployeeRepository;

use crate::{AppState, middleware::AuthEmployee};

/// Creates the employee routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", post(create_employee))
        .route("/employees", get(list_employees))
        .route("/employees/{employee_id}", get(get_employee))
        .route("/employees/{employee_id}", patch(update_employee))
        .route("/employees/{employee_id}", delete(deactivate_employee))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an employee.
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeBody {
    /// National document number, unique.
    pub document_number: String,
    /// Full name.
    pub name: String,
    /// Email, unique.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Company tag.
    pub company: Option<String>,
    /// Country id.
    pub country_id: Uuid,
    /// Direct manager id.
    pub lead_id: Option<Uuid>,
    /// Hire date.
    pub hire_date: Option<NaiveDate>,
    /// Custom work-week override.
    pub working_days: Option<WorkWeek>,
    /// Role names; must contain at least one of employee, leader, hr, admin.
    pub roles: Vec<String>,
}

/// Request body for updating an employee.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEmployeeBody {
    /// New name.
    pub name: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New company tag.
    pub company: Option<String>,
    /// New direct manager.
    pub lead_id: Option<Uuid>,
    /// New hire date.
    pub hire_date: Option<NaiveDate>,
    /// New custom work-week override.
    pub working_days: Option<WorkWeek>,
    /// New role names.
    pub roles: Option<Vec<String>>,
}

/// Response for an employee.
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    /// Employee id.
    pub id: Uuid,
    /// Document number.
    pub document_number: String,
    /// Full name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Phone.
    pub phone: Option<String>,
    /// Company tag.
    pub company: Option<String>,
    /// Country id.
    pub country_id: Uuid,
    /// Direct manager id.
    pub lead_id: Option<Uuid>,
    /// Hire date.
    pub hire_date: Option<NaiveDate>,
    /// Custom work-week override, when set.
    pub working_days: Option<WorkWeek>,
    /// Held roles.
    pub roles: Vec<&'static str>,
    /// Active flag.
    pub active: bool,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/employees` - Create an employee.
async fn create_employee(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Json(payload): Json<CreateEmployeeBody>,
) -> impl IntoResponse {
    if !auth.roles().can_manage() {
        return forbidden();
    }

    let roles = match parse_roles(&payload.roles) {
        Ok(roles) => roles,
        Err(response) => return response,
    };

    let repo = EmployeeRepository::new((*state.db).clone());
    let input = CreateEmployeeInput {
        document_number: payload.document_number,
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        company: payload.company,
        country_id: payload.country_id,
        lead_id: payload.lead_id,
        hire_date: payload.hire_date,
        working_days: payload.working_days,
        roles,
    };

    match repo.create(input).await {
        Ok(employee) => {
            info!(employee_id = %employee.id, "Employee created");
            (StatusCode::CREATED, Json(employee_to_response(&employee))).into_response()
        }
        Err(e) => employee_error_response(&e),
    }
}

/// GET `/employees` - List employees (HR/admin).
async fn list_employees(State(state): State<AppState>, auth: AuthEmployee) -> impl IntoResponse {
    if !auth.roles().can_manage() {
        return forbidden();
    }

    let repo = EmployeeRepository::new((*state.db).clone());
    match repo.list(false).await {
        Ok(employees) => {
            let items: Vec<EmployeeResponse> =
                employees.iter().map(employee_to_response).collect();
            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => employee_error_response(&e),
    }
}

/// GET `/employees/{employee_id}` - Employee detail (self or HR/admin).
async fn get_employee(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(employee_id): Path<Uuid>,
) -> impl IntoResponse {
    if employee_id != auth.id() && !auth.roles().can_manage() {
        return forbidden();
    }

    let repo = EmployeeRepository::new((*state.db).clone());
    match repo.get(employee_id).await {
        Ok(employee) => (StatusCode::OK, Json(employee_to_response(&employee))).into_response(),
        Err(e) => employee_error_response(&e),
    }
}

/// PATCH `/employees/{employee_id}` - Update an employee (HR/admin).
async fn update_employee(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(employee_id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeeBody>,
) -> impl IntoResponse {
    if !auth.roles().can_manage() {
        return forbidden();
    }

    let roles = match payload.roles {
        Some(ref names) => match parse_roles(names) {
            Ok(roles) => Some(roles),
            Err(response) => return response,
        },
        None => None,
    };

    let repo = EmployeeRepository::new((*state.db).clone());
    let input = UpdateEmployeeInput {
        name: payload.name,
        phone: payload.phone.map(Some),
        company: payload.company.map(Some),
        lead_id: payload.lead_id.map(Some),
        hire_date: payload.hire_date.map(Some),
        working_days: payload.working_days.map(Some),
        roles,
    };

    match repo.update(employee_id, input).await {
        Ok(employee) => (StatusCode::OK, Json(employee_to_response(&employee))).into_response(),
        Err(e) => employee_error_response(&e),
    }
}

/// DELETE `/employees/{employee_id}` - Soft-deactivate an employee.
async fn deactivate_employee(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(employee_id): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.roles().can_manage() {
        return forbidden();
    }

    let repo = EmployeeRepository::new((*state.db).clone());
    match repo.deactivate(employee_id).await {
        Ok(employee) => {
            info!(employee_id = %employee.id, "Employee deactivated");
            (StatusCode::OK, Json(employee_to_response(&employee))).into_response()
        }
        Err(e) => employee_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_roles(names: &[String]) -> Result<RoleSet, Response> {
    let mut roles = RoleSet::new();
    for name in names {
        match Role::parse(name) {
            Some(role) => roles.insert(role),
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_role",
                        "message": format!("Unknown role: {name}")
                    })),
                )
                    .into_response());
            }
        }
    }
    Ok(roles)
}

fn employee_to_response(employee: &employees::Model) -> EmployeeResponse {
    EmployeeResponse {
        id: employee.id,
        document_number: employee.document_number.clone(),
        name: employee.name.clone(),
        email: employee.email.clone(),
        phone: employee.phone.clone(),
        company: employee.company.clone(),
        country_id: employee.country_id,
        lead_id: employee.lead_id,
        hire_date: employee.hire_date,
        working_days: custom_workweek(employee),
        roles: role_set(employee).iter().map(|r| r.as_str()).collect(),
        active: employee.active,
    }
}

fn employee_error_response(e: &EmployeeError) -> Response {
    match e {
        EmployeeError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "employee_not_found",
                "message": e.to_string()
            })),
        )
            .into_response(),
        EmployeeError::DuplicateDocument(_) | EmployeeError::DuplicateEmail(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_employee",
                "message": e.to_string()
            })),
        )
            .into_response(),
        EmployeeError::NoRoles => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "no_roles",
                "message": e.to_string()
            })),
        )
            .into_response(),
        EmployeeError::Database(_) => {
            error!(error = %e, "Employee operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": "HR or admin role required for this operation"
        })),
    )
        .into_response()
}
