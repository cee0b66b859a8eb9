use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::prelude::InviteStatus;
use crate::schemas::{
    AcceptInviteRequest, EmployeeEnvelope, EmployeeResponse, InviteEnvelope, InviteResponse,
};
use crate::state::AppState;

/// Public invite routes; the token in the path is the credential
pub fn invites_routes(state: AppState) -> Router {
    Router::new()
        .route("/{token}", get(get_invite))
        .route("/{token}/accept", post(accept_invite))
        .with_state(state)
}

/// Show an invite to the person who received the link
async fn get_invite(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<InviteEnvelope>> {
    let resolved = state.invites.resolve(&token).await?;

    if resolved.status() == InviteStatus::Expired {
        return Err(AppError::BadRequest(
            "This invitation has expired".to_string(),
        ));
    }

    Ok(Json(InviteEnvelope {
        invite: InviteResponse::from(resolved),
    }))
}

/// Accept an invite and create the employee's login
async fn accept_invite(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<AcceptInviteRequest>,
) -> Result<Json<EmployeeEnvelope>> {
    request
        .validate()
        .map_err(|_| AppError::BadRequest("Password is required".to_string()))?;

    let accepted = state.invites.accept(&token, &request.password).await?;

    Ok(Json(EmployeeEnvelope {
        employee: EmployeeResponse::from(accepted.employee),
    }))
}
