//! Authentication middleware for protected routes
//!
//! Resolves the Bearer token to a platform admin or a customer.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::services::security::ActorType;
use crate::services::Actor;
use crate::state::AppState;

/// Authenticated actor stored in request extensions
#[derive(Clone)]
pub struct AuthenticatedActor(pub Actor);

/// Auth middleware that validates Bearer tokens.
///
/// Returns 401 Unauthorized if the token is missing or invalid, or if the
/// account it names no longer exists.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match extract_bearer_token(&req) {
        Some(t) => t,
        None => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    let actor = match validate_token_and_get_actor(&state, &token).await {
        Ok(a) => a,
        Err(msg) => {
            return unauthorized_response(&msg);
        }
    };

    req.extensions_mut().insert(AuthenticatedActor(actor));

    next.run(req).await
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(req: &Request) -> Option<String> {
    let auth_header = req.headers().get(AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;
    Some(token.to_string())
}

async fn validate_token_and_get_actor(state: &AppState, token: &str) -> Result<Actor, String> {
    let claims = state
        .jwt
        .decode_token(token)
        .map_err(|_| "Invalid or expired token".to_string())?;

    let actor = match claims.actor_type {
        ActorType::User => state
            .accounts
            .find_user(&claims.sub)
            .await
            .map_err(|e| format!("Database error: {}", e))?
            .map(Actor::PlatformAdmin),
        ActorType::Customer => state
            .accounts
            .find_customer(&claims.sub)
            .await
            .map_err(|e| format!("Database error: {}", e))?
            .map(Actor::Customer),
    };

    actor.ok_or_else(|| "Account not found".to_string())
}

/// Create a 401 Unauthorized JSON response
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "detail": message
        })),
    )
        .into_response()
}
