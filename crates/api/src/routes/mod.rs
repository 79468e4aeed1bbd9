//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::identity_middleware};

pub mod balances;
pub mod calendar;
pub mod countries;
pub mod employees;
pub mod health;
pub mod policies;
pub mod requests;

/// Creates the API router with protected routes that need state for
/// middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require a resolved identity
    let protected_routes = Router::new()
        .merge(requests::routes())
        .merge(balances::routes())
        .merge(calendar::routes())
        .merge(employees::routes())
        .merge(countries::routes())
        .merge(policies::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ));

    // Combine public and protected routes
    Router::new().merge(health::routes()).merge(protected_routes)
}
