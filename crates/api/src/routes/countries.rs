//! Country management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use feriado_core::calendar::WorkWeek;
use feriado_db::entities::countries;
use feriado_db::repositories::country::{
    country_workweek, CountryError, CreateCountryInput, UpdateCountryInput,
};
use feriado_db::CountryRepository;

use crate::{AppState, middleware::AuthEmployee};

/// Creates the country routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/countries", post(create_country))
        .route("/countries", get(list_countries))
        .route("/countries/{country_id}", patch(update_country))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a country.
#[derive(Debug, Deserialize)]
pub struct CreateCountryBody {
    /// Country name, unique.
    pub name: String,
    /// Locale word for "vacation".
    pub vacation_term: Option<String>,
    /// Annual day grant (1..=30).
    pub default_vacation_days: Option<i32>,
    /// Work-week mask; defaults to Monday-Friday.
    pub working_days: Option<WorkWeek>,
    /// ISO code for the public-holiday provider.
    pub holiday_key: Option<String>,
}

/// Request body for updating a country.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCountryBody {
    /// New vacation term.
    pub vacation_term: Option<String>,
    /// New annual day grant.
    pub default_vacation_days: Option<i32>,
    /// New work-week mask.
    pub working_days: Option<WorkWeek>,
    /// New holiday key.
    pub holiday_key: Option<String>,
}

/// Response for a country.
#[derive(Debug, Serialize)]
pub struct CountryResponse {
    /// Country id.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Locale word for "vacation".
    pub vacation_term: String,
    /// Annual day grant.
    pub default_vacation_days: i32,
    /// Work-week mask.
    pub working_days: WorkWeek,
    /// Holiday provider key.
    pub holiday_key: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/countries` - Create a country (HR/admin).
async fn create_country(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Json(payload): Json<CreateCountryBody>,
) -> impl IntoResponse {
    if !auth.roles().can_manage() {
        return forbidden();
    }

    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "name_required",
                "message": "Name is required"
            })),
        )
            .into_response();
    }

    if let Some(days) = payload.default_vacation_days
        && !(1..=30).contains(&days)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_day_grant",
                "message": "default_vacation_days must be between 1 and 30"
            })),
        )
            .into_response();
    }

    let repo = CountryRepository::new((*state.db).clone());
    let input = CreateCountryInput {
        name: payload.name,
        vacation_term: payload.vacation_term,
        default_vacation_days: payload.default_vacation_days,
        working_days: payload.working_days,
        holiday_key: payload.holiday_key,
    };

    match repo.create(input).await {
        Ok(country) => {
            info!(country_id = %country.id, "Country created");
            (StatusCode::CREATED, Json(country_to_response(&country))).into_response()
        }
        Err(e) => country_error_response(&e),
    }
}

/// GET `/countries` - List countries.
async fn list_countries(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CountryRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(countries) => {
            let items: Vec<CountryResponse> = countries.iter().map(country_to_response).collect();
            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => country_error_response(&e),
    }
}

/// PATCH `/countries/{country_id}` - Update a country (HR/admin).
async fn update_country(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(country_id): Path<Uuid>,
    Json(payload): Json<UpdateCountryBody>,
) -> impl IntoResponse {
    if !auth.roles().can_manage() {
        return forbidden();
    }

    let repo = CountryRepository::new((*state.db).clone());
    let input = UpdateCountryInput {
        vacation_term: payload.vacation_term,
        default_vacation_days: payload.default_vacation_days,
        working_days: payload.working_days,
        holiday_key: payload.holiday_key.map(Some),
    };

    match repo.update(country_id, input).await {
        Ok(country) => (StatusCode::OK, Json(country_to_response(&country))).into_response(),
        Err(e) => country_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn country_to_response(country: &countries::Model) -> CountryResponse {
    CountryResponse {
        id: country.id,
        name: country.name.clone(),
        vacation_term: country.vacation_term.clone(),
        default_vacation_days: country.default_vacation_days,
        working_days: country_workweek(country),
        holiday_key: country.holiday_key.clone(),
    }
}

fn country_error_response(e: &CountryError) -> Response {
    match e {
        CountryError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "country_not_found",
                "message": e.to_string()
            })),
        )
            .into_response(),
        CountryError::DuplicateName(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_country",
                "message": e.to_string()
            })),
        )
            .into_response(),
        CountryError::Database(_) => {
            error!(error = %e, "Country operation failed");
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
