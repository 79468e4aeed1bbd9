//! Vacation balance routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use feriado_db::entities::vacation_balances;
use feriado_db::repositories::balance::BalanceError;
use feriado_db::BalanceRepository;

use crate::{AppState, middleware::AuthEmployee};

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/balances/{employee_id}/{year}", get(get_balance))
        .route("/balances/recalculate", post(recalculate_balances))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for triggering a recalculation.
#[derive(Debug, Default, Deserialize)]
pub struct RecalculateBody {
    /// Ledger year; defaults to the current year.
    pub year: Option<i32>,
}

/// Response for one balance row.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// The employee.
    pub employee_id: Uuid,
    /// Ledger year.
    pub year: i32,
    /// Tenure on the 360-day commercial year.
    pub worked_days: i32,
    /// Accrued entitlement.
    pub days_to_enjoy: i32,
    /// Days held by approved requests.
    pub days_scheduled: i32,
    /// Days consumed by taken requests.
    pub used_days: i32,
    /// Remaining: days_to_enjoy - used_days - days_scheduled.
    pub days_available: i32,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/balances/{employee_id}/{year}` - Balance row, created lazily.
///
/// Employees see their own balance; HR and admins see anyone's.
async fn get_balance(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path((employee_id, year)): Path<(Uuid, i32)>,
) -> impl IntoResponse {
    if employee_id != auth.id() && !auth.roles().can_manage() {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "You may only view your own balance"
            })),
        )
            .into_response();
    }

    let repo = BalanceRepository::new((*state.db).clone());
    match repo.get_or_create(employee_id, year).await {
        Ok(balance) => (StatusCode::OK, Json(balance_to_response(&balance))).into_response(),
        Err(e) => balance_error_response(&e),
    }
}

/// POST `/balances/recalculate` - Batch recalculation trigger.
///
/// Also runs on a schedule; this endpoint lets HR force a pass after
/// imports or corrections.
async fn recalculate_balances(
    State(state): State<AppState>,
    auth: AuthEmployee,
    payload: Option<Json<RecalculateBody>>,
) -> impl IntoResponse {
    if !auth.roles().can_manage() {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Only HR may trigger a recalculation"
            })),
        )
            .into_response();
    }

    let year = payload
        .and_then(|Json(body)| body.year)
        .unwrap_or_else(|| Utc::now().date_naive().year());

    let repo = BalanceRepository::new((*state.db).clone());
    match repo.recalculate_all(year).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({
                "year": summary.year,
                "processed": summary.processed,
                "skipped": summary.skipped,
                "failed": summary.failed,
            })),
        )
            .into_response(),
        Err(e) => balance_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn balance_to_response(balance: &vacation_balances::Model) -> BalanceResponse {
    BalanceResponse {
        employee_id: balance.employee_id,
        year: balance.year,
        worked_days: balance.worked_days,
        days_to_enjoy: balance.days_to_enjoy,
        days_scheduled: balance.days_scheduled,
        used_days: balance.used_days,
        days_available: balance.days_available,
    }
}

fn balance_error_response(e: &BalanceError) -> Response {
    match e {
        BalanceError::EmployeeNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "employee_not_found",
                "message": e.to_string()
            })),
        )
            .into_response(),
        BalanceError::NotYetHired { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "not_yet_hired",
                "message": e.to_string()
            })),
        )
            .into_response(),
        BalanceError::Database(_) => {
            error!(error = %e, "Balance operation failed");
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
