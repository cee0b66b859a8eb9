use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedActor;
use crate::schemas::CustomerResponse;
use crate::services::Actor;
use crate::state::AppState;

pub fn customers_routes(state: AppState) -> Router {
    Router::new()
        .route("/me", get(get_current_customer))
        .with_state(state)
}

/// The signed-in customer with their active employments
async fn get_current_customer(
    State(state): State<AppState>,
    Extension(AuthenticatedActor(actor)): Extension<AuthenticatedActor>,
) -> Result<Json<CustomerResponse>> {
    let Actor::Customer(customer) = actor else {
        return Err(AppError::Forbidden(
            "Only customers have a customer profile".to_string(),
        ));
    };

    let employments = state.employees.list_for_customer(&customer.id).await?;
    Ok(Json(CustomerResponse::new(customer, employments)))
}
