//! Calendar preview route.
//!
//! Feeds the client-side day-count widget: the acting employee's
//! effective work-week mask plus the holiday dates for the current and
//! next year, so a request may span the year boundary.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use feriado_core::calendar::WorkWeek;
use feriado_db::repositories::country::country_workweek;
use feriado_db::repositories::employee::custom_workweek;
use feriado_db::CountryRepository;

use crate::{AppState, middleware::AuthEmployee};

/// Creates the calendar routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/calendar/working-days", get(working_days))
}

/// Response for the working-days preview.
#[derive(Debug, Serialize)]
pub struct WorkingDaysResponse {
    /// Effective work-week mask for the acting employee.
    pub working_days: WorkWeek,
    /// Holiday dates for the current and next year, ascending.
    pub holidays: Vec<NaiveDate>,
}

/// GET `/calendar/working-days` - Effective mask and holidays.
async fn working_days(State(state): State<AppState>, auth: AuthEmployee) -> impl IntoResponse {
    let country_repo = CountryRepository::new((*state.db).clone());
    let country = match country_repo.get(auth.employee().country_id).await {
        Ok(country) => country,
        Err(e) => {
            error!(error = %e, "Failed to load employee country");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    };

    let current_year = Utc::now().date_naive().year();
    let holidays = match state
        .holidays
        .calendar(country.holiday_key.as_deref(), current_year..=current_year + 1)
        .await
    {
        Ok(dates) => dates,
        Err(e) => {
            error!(error = %e, "Holiday provider unavailable");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "holiday_provider_unavailable",
                    "message": "Could not load the public-holiday calendar"
                })),
            )
                .into_response();
        }
    };

    let effective = WorkWeek::effective(
        custom_workweek(auth.employee()),
        country_workweek(&country),
    );

    (
        StatusCode::OK,
        Json(WorkingDaysResponse {
            working_days: effective,
            holidays,
        }),
    )
        .into_response()
}
