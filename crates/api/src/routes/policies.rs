//! Approval policy management routes (HR/admin).
//!
//! Gates can be added, reconfigured, and deactivated at runtime; the
//! last remaining active+required gate can never be removed.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use feriado_core::workflow::Role;
use feriado_db::entities::approval_policy_entries;
use feriado_db::repositories::policy::{
    db_role_to_core, CreatePolicyEntryInput, PolicyError, UpdatePolicyEntryInput,
};
use feriado_db::PolicyRepository;

use crate::{AppState, middleware::AuthEmployee};

/// Creates the approval policy routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/approval-policy", get(list_entries))
        .route("/approval-policy", post(create_entry))
        .route("/approval-policy/{entry_id}", patch(update_entry))
        .route("/approval-policy/{entry_id}", delete(deactivate_entry))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a policy entry.
#[derive(Debug, Deserialize)]
pub struct CreatePolicyEntryBody {
    /// Role name (employee, leader, hr, admin).
    pub role: String,
    /// Whether the gate is required for full approval.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Ordering hint.
    #[serde(default)]
    pub order_position: i16,
    /// Approvals needed from this role.
    #[serde(default = "default_minimum")]
    pub minimum_approvals: i16,
    /// Description.
    pub description: Option<String>,
}

fn default_required() -> bool {
    true
}

fn default_minimum() -> i16 {
    1
}

/// Request body for updating a policy entry.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePolicyEntryBody {
    /// New required flag.
    pub required: Option<bool>,
    /// New ordering hint.
    pub order_position: Option<i16>,
    /// New minimum approvals.
    pub minimum_approvals: Option<i16>,
    /// New description.
    pub description: Option<String>,
}

/// Response for a policy entry.
#[derive(Debug, Serialize)]
pub struct PolicyEntryResponse {
    /// Entry id.
    pub id: Uuid,
    /// Role name.
    pub role: &'static str,
    /// Required flag.
    pub required: bool,
    /// Ordering hint.
    pub order_position: i16,
    /// Minimum approvals.
    pub minimum_approvals: i16,
    /// Description.
    pub description: Option<String>,
    /// Active flag.
    pub active: bool,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/approval-policy` - List policy entries (HR/admin).
async fn list_entries(State(state): State<AppState>, auth: AuthEmployee) -> impl IntoResponse {
    if !auth.roles().can_manage() {
        return forbidden();
    }

    let repo = PolicyRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(entries) => {
            let items: Vec<PolicyEntryResponse> = entries.iter().map(entry_to_response).collect();
            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => policy_error_response(&e),
    }
}

/// POST `/approval-policy` - Add a gate (HR/admin).
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Json(payload): Json<CreatePolicyEntryBody>,
) -> impl IntoResponse {
    if !auth.roles().can_manage() {
        return forbidden();
    }

    let Some(role) = Role::parse(&payload.role) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_role",
                "message": format!("Unknown role: {}", payload.role)
            })),
        )
            .into_response();
    };

    let repo = PolicyRepository::new((*state.db).clone());
    let input = CreatePolicyEntryInput {
        role,
        required: payload.required,
        order_position: payload.order_position,
        minimum_approvals: payload.minimum_approvals,
        description: payload.description,
    };

    match repo.create(input).await {
        Ok(entry) => {
            info!(entry_id = %entry.id, role = %role, "Approval gate created");
            (StatusCode::CREATED, Json(entry_to_response(&entry))).into_response()
        }
        Err(e) => policy_error_response(&e),
    }
}

/// PATCH `/approval-policy/{entry_id}` - Reconfigure a gate (HR/admin).
async fn update_entry(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<UpdatePolicyEntryBody>,
) -> impl IntoResponse {
    if !auth.roles().can_manage() {
        return forbidden();
    }

    let repo = PolicyRepository::new((*state.db).clone());
    let input = UpdatePolicyEntryInput {
        required: payload.required,
        order_position: payload.order_position,
        minimum_approvals: payload.minimum_approvals,
        description: payload.description.map(Some),
    };

    match repo.update(entry_id, input).await {
        Ok(entry) => (StatusCode::OK, Json(entry_to_response(&entry))).into_response(),
        Err(e) => policy_error_response(&e),
    }
}

/// DELETE `/approval-policy/{entry_id}` - Deactivate a gate (HR/admin).
async fn deactivate_entry(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(entry_id): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.roles().can_manage() {
        return forbidden();
    }

    let repo = PolicyRepository::new((*state.db).clone());
    match repo.deactivate(entry_id).await {
        Ok(entry) => {
            info!(entry_id = %entry.id, "Approval gate deactivated");
            (StatusCode::OK, Json(entry_to_response(&entry))).into_response()
        }
        Err(e) => policy_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn entry_to_response(entry: &approval_policy_entries::Model) -> PolicyEntryResponse {
    PolicyEntryResponse {
        id: entry.id,
        role: db_role_to_core(&entry.role).as_str(),
        required: entry.required,
        order_position: entry.order_position,
        minimum_approvals: entry.minimum_approvals,
        description: entry.description.clone(),
        active: entry.active,
    }
}

fn policy_error_response(e: &PolicyError) -> Response {
    match e {
        PolicyError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "policy_entry_not_found",
                "message": e.to_string()
            })),
        )
            .into_response(),
        PolicyError::DuplicateRole(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_role",
                "message": e.to_string()
            })),
        )
            .into_response(),
        PolicyError::InvalidMinimum => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_minimum",
                "message": e.to_string()
            })),
        )
            .into_response(),
        PolicyError::LastRequiredGate => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "last_required_gate",
                "message": e.to_string()
            })),
        )
            .into_response(),
        PolicyError::Database(_) => {
            error!(error = %e, "Policy operation failed");
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
