//! Identity middleware for protected routes.
//!
//! Session mechanics live in an upstream identity provider (a reverse
//! proxy or gateway) that injects the authenticated employee's id in the
//! `X-Employee-Id` header. This middleware resolves the header to an
//! active employee row and stores it in request extensions.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use feriado_core::workflow::RoleSet;
use feriado_db::entities::employees;
use feriado_db::repositories::employee::role_set;
use feriado_db::EmployeeRepository;

use crate::AppState;

/// Header carrying the acting employee's id, set by the identity provider.
pub const EMPLOYEE_ID_HEADER: &str = "x-employee-id";

/// Identity middleware.
///
/// This middleware:
/// 1. Reads the `X-Employee-Id` header
/// 2. Resolves it to an active employee
/// 3. Stores the employee in request extensions for handlers to access
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(EMPLOYEE_ID_HEADER)
        .and_then(|h| h.to_str().ok());

    let Some(employee_id) = header.and_then(|h| Uuid::parse_str(h).ok()) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_identity",
                "message": "X-Employee-Id header with a valid employee id is required"
            })),
        )
            .into_response();
    };

    let repo = EmployeeRepository::new((*state.db).clone());
    match repo.get_active(employee_id).await {
        Ok(employee) => {
            request.extensions_mut().insert(AuthEmployee(employee));
            next.run(request).await
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "unknown_identity",
                "message": "No active employee matches the provided identity"
            })),
        )
            .into_response(),
    }
}

/// Extractor for the acting employee.
///
/// Use this in handlers to get the authenticated employee:
///
/// ```ignore
/// async fn handler(auth: AuthEmployee) -> impl IntoResponse {
///     let employee_id = auth.id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthEmployee(pub employees::Model);

impl AuthEmployee {
    /// Returns the acting employee's id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    /// Returns the acting employee's role set.
    #[must_use]
    pub fn roles(&self) -> RoleSet {
        role_set(&self.0)
    }

    /// Returns the inner employee row.
    #[must_use]
    pub fn employee(&self) -> &employees::Model {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthEmployee
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_identity",
                "message": "Request is not authenticated"
            })),
        ))
    }
}
