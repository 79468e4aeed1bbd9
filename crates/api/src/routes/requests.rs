//! Vacation request routes: creation, listing, cancellation, and the
//! approval actions.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use feriado_core::calendar::{HolidayCalendar, WorkingCalendar};
use feriado_core::workflow::RequestStatus;
use feriado_db::entities::{employees, vacation_approvals, vacation_requests};
use feriado_db::repositories::country::country_workweek;
use feriado_db::repositories::employee::custom_workweek;
use feriado_db::repositories::request::db_status_to_core;
use feriado_db::{
    CountryRepository, EmployeeRepository, RequestRepository,
    repositories::request::{CreateRequestInput, RequestError},
};

use crate::{AppState, middleware::AuthEmployee};

/// Creates the vacation request routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/requests", post(create_request))
        .route("/requests", get(list_requests))
        .route("/requests/{request_id}", get(get_request))
        .route("/requests/{request_id}", delete(cancel_request))
        .route("/requests/{request_id}/approve", post(approve_request))
        .route("/requests/{request_id}/reject", post(reject_request))
        .route("/requests/{request_id}/take", post(take_request))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a vacation request.
#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    /// Employee the request is for; defaults to the acting employee.
    /// Filing on someone else's behalf requires HR or admin.
    pub employee_id: Option<Uuid>,
    /// First day off, inclusive.
    pub start_date: NaiveDate,
    /// Last day off, inclusive.
    pub end_date: NaiveDate,
    /// Historical import path: record directly as taken (HR/admin only).
    #[serde(default)]
    pub imported_taken: bool,
}

/// Request body for rejecting a request.
#[derive(Debug, Default, Deserialize)]
pub struct RejectBody {
    /// Reason shown to the employee; a default is used when absent.
    pub reason: Option<String>,
}

/// Query filters for listing requests.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter by employee.
    pub employee_id: Option<Uuid>,
    /// Filter by status (pending, approved, rejected, taken).
    pub status: Option<String>,
}

/// Response for a vacation request.
#[derive(Debug, Serialize)]
pub struct RequestResponse {
    /// Request id.
    pub id: Uuid,
    /// The requesting employee.
    pub employee_id: Uuid,
    /// First day off.
    pub start_date: NaiveDate,
    /// Last day off.
    pub end_date: NaiveDate,
    /// Derived working-day count.
    pub days_requested: i32,
    /// Current status.
    pub status: &'static str,
    /// Final approver, once fully approved.
    pub approved_by: Option<Uuid>,
    /// Approval timestamp.
    pub approved_at: Option<String>,
    /// Rejection reason, if rejected.
    pub rejected_reason: Option<String>,
    /// Company tag.
    pub company: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Response for one approval record.
#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    /// The approver.
    pub employee_id: Uuid,
    /// Role slot the approval fills.
    pub role: String,
    /// Slot status.
    pub status: String,
    /// Decision timestamp.
    pub decided_at: Option<String>,
    /// Approver comment or rejection reason.
    pub comment: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/requests` - Create a vacation request.
async fn create_request(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Json(payload): Json<CreateRequestBody>,
) -> impl IntoResponse {
    let target_id = payload.employee_id.unwrap_or_else(|| auth.id());

    // Filing for someone else (or importing history) is an HR/admin action.
    if (target_id != auth.id() || payload.imported_taken) && !auth.roles().can_manage() {
        return forbidden("Only HR may file requests on behalf of other employees");
    }

    let employee_repo = EmployeeRepository::new((*state.db).clone());
    let target = match employee_repo.get_active(target_id).await {
        Ok(employee) => employee,
        Err(e) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "employee_not_found",
                    "message": e.to_string()
                })),
            )
                .into_response();
        }
    };

    let years = payload.start_date.year().min(payload.end_date.year())
        ..=payload.start_date.year().max(payload.end_date.year());
    let calendar = match working_calendar_for(&state, &target, years).await {
        Ok(calendar) => calendar,
        Err(response) => return response,
    };

    let repo = RequestRepository::new((*state.db).clone());
    let input = CreateRequestInput {
        employee_id: target.id,
        start_date: payload.start_date,
        end_date: payload.end_date,
        imported_taken: payload.imported_taken,
    };

    match repo.create(input, &calendar).await {
        Ok(request) => (StatusCode::CREATED, Json(request_to_response(&request))).into_response(),
        Err(e) => request_error_response(&e),
    }
}

/// GET `/requests` - List requests.
///
/// Employees without an approving role only see their own requests.
async fn list_requests(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let employee_filter = if auth.roles().can_approve_requests() {
        query.employee_id
    } else {
        Some(auth.id())
    };

    let status_filter = match query.status.as_deref() {
        None => None,
        Some(raw) => match RequestStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_status",
                        "message": format!("Unknown status filter: {raw}")
                    })),
                )
                    .into_response();
            }
        },
    };

    let repo = RequestRepository::new((*state.db).clone());
    match repo.list(employee_filter, status_filter).await {
        Ok(requests) => {
            let items: Vec<RequestResponse> = requests.iter().map(request_to_response).collect();
            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => request_error_response(&e),
    }
}

/// GET `/requests/{request_id}` - Request detail with approval records.
async fn get_request(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(request_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = RequestRepository::new((*state.db).clone());

    let request = match repo.get(request_id).await {
        Ok(request) => request,
        Err(e) => return request_error_response(&e),
    };

    if request.employee_id != auth.id() && !auth.roles().can_approve_requests() {
        return forbidden("You may only view your own requests");
    }

    let approvals = match repo.approvals_for(request_id).await {
        Ok(approvals) => approvals,
        Err(e) => return request_error_response(&e),
    };

    let approvals: Vec<ApprovalResponse> = approvals.iter().map(approval_to_response).collect();
    (
        StatusCode::OK,
        Json(json!({
            "request": request_to_response(&request),
            "approvals": approvals,
        })),
    )
        .into_response()
}

/// DELETE `/requests/{request_id}` - Cancel a pending future request.
async fn cancel_request(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(request_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = RequestRepository::new((*state.db).clone());
    match repo.cancel(request_id, auth.id()).await {
        Ok(()) => (StatusCode::NO_CONTENT, ()).into_response(),
        Err(e) => request_error_response(&e),
    }
}

/// POST `/requests/{request_id}/approve` - Record one approval.
async fn approve_request(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(request_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = RequestRepository::new((*state.db).clone());

    match repo.approve(request_id, auth.id()).await {
        Ok(outcome) => {
            if outcome.newly_approved {
                notify_approved(&state, &outcome.request).await;
            }
            (StatusCode::OK, Json(request_to_response(&outcome.request))).into_response()
        }
        Err(e) => request_error_response(&e),
    }
}

/// POST `/requests/{request_id}/reject` - Veto a pending request.
async fn reject_request(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(request_id): Path<Uuid>,
    payload: Option<Json<RejectBody>>,
) -> impl IntoResponse {
    let reason = payload.and_then(|Json(body)| body.reason);

    let repo = RequestRepository::new((*state.db).clone());
    match repo.reject(request_id, auth.id(), reason).await {
        Ok(request) => (StatusCode::OK, Json(request_to_response(&request))).into_response(),
        Err(e) => request_error_response(&e),
    }
}

/// POST `/requests/{request_id}/take` - Mark an approved request as taken.
async fn take_request(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(request_id): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.roles().can_mark_taken() {
        return forbidden("Only HR may mark requests as taken");
    }

    let repo = RequestRepository::new((*state.db).clone());
    match repo.mark_taken(request_id).await {
        Ok(request) => (StatusCode::OK, Json(request_to_response(&request))).into_response(),
        Err(e) => request_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Builds the employee's working calendar for a span of years.
pub async fn working_calendar_for(
    state: &AppState,
    employee: &employees::Model,
    years: std::ops::RangeInclusive<i32>,
) -> Result<WorkingCalendar, Response> {
    let country_repo = CountryRepository::new((*state.db).clone());
    let country = country_repo.get(employee.country_id).await.map_err(|e| {
        error!(error = %e, "Failed to load employee country");
        internal_error()
    })?;

    let dates = state
        .holidays
        .calendar(country.holiday_key.as_deref(), years)
        .await
        .map_err(|e| {
            error!(error = %e, "Holiday provider unavailable");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "holiday_provider_unavailable",
                    "message": "Could not load the public-holiday calendar"
                })),
            )
                .into_response()
        })?;

    Ok(WorkingCalendar::for_employee(
        custom_workweek(employee),
        country_workweek(&country),
        HolidayCalendar::from_dates(dates),
    ))
}

/// Fires the "request approved" notification, fire-and-forget.
async fn notify_approved(state: &AppState, request: &vacation_requests::Model) {
    let employee_repo = EmployeeRepository::new((*state.db).clone());
    let country_repo = CountryRepository::new((*state.db).clone());

    let Ok(employee) = employee_repo.get(request.employee_id).await else {
        warn!(request_id = %request.id, "Cannot notify: employee missing");
        return;
    };
    let term = match country_repo.get(employee.country_id).await {
        Ok(country) => country.vacation_term,
        Err(_) => "vacation".to_string(),
    };

    let notifier = state.notifier.clone();
    let (start, end) = (request.start_date, request.end_date);
    let request_id = request.id;
    tokio::spawn(async move {
        if let Err(e) = notifier
            .send_request_approved(&employee.email, &employee.name, &term, start, end)
            .await
        {
            warn!(request_id = %request_id, error = %e, "Approval notification failed");
        }
    });
}

fn request_to_response(request: &vacation_requests::Model) -> RequestResponse {
    RequestResponse {
        id: request.id,
        employee_id: request.employee_id,
        start_date: request.start_date,
        end_date: request.end_date,
        days_requested: request.days_requested,
        status: db_status_to_core(&request.status).as_str(),
        approved_by: request.approved_by,
        approved_at: request.approved_at.map(|t| t.to_rfc3339()),
        rejected_reason: request.rejected_reason.clone(),
        company: request.company.clone(),
        created_at: request.created_at.to_rfc3339(),
    }
}

fn approval_to_response(approval: &vacation_approvals::Model) -> ApprovalResponse {
    use feriado_db::entities::sea_orm_active_enums::ApprovalStatus;
    use feriado_db::repositories::policy::db_role_to_core;

    let status = match approval.status {
        ApprovalStatus::Pending => "pending",
        ApprovalStatus::Approved => "approved",
        ApprovalStatus::Rejected => "rejected",
    };

    ApprovalResponse {
        employee_id: approval.employee_id,
        role: db_role_to_core(&approval.role).to_string(),
        status: status.to_string(),
        decided_at: approval.decided_at.map(|t| t.to_rfc3339()),
        comment: approval.comment.clone(),
    }
}

fn request_error_response(e: &RequestError) -> Response {
    if let RequestError::Validation(issues) = e {
        let details: Vec<serde_json::Value> = issues
            .iter()
            .map(|issue| {
                json!({
                    "field": issue.field(),
                    "message": issue.to_string(),
                })
            })
            .collect();

        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "One or more fields are invalid",
                "details": details,
            })),
        )
            .into_response();
    }

    if matches!(e, RequestError::Database(_)) {
        error!(error = %e, "Request operation failed");
        return internal_error();
    }

    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": e.error_code().to_lowercase(),
            "message": e.to_string(),
        })),
    )
        .into_response()
}

fn forbidden(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
