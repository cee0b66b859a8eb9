pub mod auth;
pub mod companies;
pub mod customers;
pub mod invites;

use axum::{middleware as axum_middleware, Router};

use crate::middleware::{require_auth, security_headers};
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/auth", auth::auth_routes(state.clone()))
        .nest("/invites", invites::invites_routes(state.clone()));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .nest("/companies", companies::companies_routes(state.clone()))
        .nest("/customers", customers::customers_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(state, require_auth));

    public_routes
        .merge(protected_routes)
        .layer(axum_middleware::from_fn(security_headers))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
