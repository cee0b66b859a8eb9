use axum::{extract::State, routing::post, Json, Router};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::schemas::{LoginRequest, TokenResponse};
use crate::services::security::ActorType;
use crate::state::AppState;

/// Create auth routes for customer and platform admin logins
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/admin/login", post(admin_login))
        .with_state(state)
}

/// Customer login with the email/password credential created on invite acceptance
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    request.validate()?;

    let customer = state
        .accounts
        .authenticate_customer(&request.email, &request.password)
        .await?
        .ok_or_else(invalid_credentials)?;

    tracing::info!(customer_id = %customer.id, "Customer logged in");
    let token = state
        .jwt
        .create_access_token(&customer.id, ActorType::Customer)?;
    Ok(Json(TokenResponse::bearer(token, state.jwt.ttl_secs())))
}

/// Platform administrator login
async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    request.validate()?;

    let user = state
        .accounts
        .authenticate_user(&request.email, &request.password)
        .await?
        .ok_or_else(invalid_credentials)?;

    tracing::info!(user_id = %user.id, "Platform admin logged in");
    let token = state.jwt.create_access_token(&user.id, ActorType::User)?;
    Ok(Json(TokenResponse::bearer(token, state.jwt.ttl_secs())))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}
