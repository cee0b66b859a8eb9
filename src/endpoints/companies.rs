use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::error::Result;
use crate::middleware::AuthenticatedActor;
use crate::schemas::{
    InviteEmployeeRequest, InviteEnvelope, InviteListResponse, InviteResponse,
    ResendInviteRequest,
};
use crate::state::AppState;

/// Company routes (all require authentication)
pub fn companies_routes(state: AppState) -> Router {
    Router::new()
        .route("/{id}/invite-employee", post(invite_employee))
        .route("/{id}/resend-invite", post(resend_invite))
        .route("/{id}/invites", get(list_invites))
        .route("/{id}/employees/{employee_id}", delete(delete_employee))
        .with_state(state)
}

/// Invite someone to the company by email
async fn invite_employee(
    State(state): State<AppState>,
    Extension(AuthenticatedActor(actor)): Extension<AuthenticatedActor>,
    Path(company_id): Path<String>,
    Json(request): Json<InviteEmployeeRequest>,
) -> Result<Json<InviteEnvelope>> {
    request.validate()?;

    let invite = state
        .invites
        .invite_employee(&actor, &company_id, request.into())
        .await?;

    Ok(Json(InviteEnvelope {
        invite: InviteResponse::from(invite),
    }))
}

/// Expire an outstanding invite and send a fresh one
async fn resend_invite(
    State(state): State<AppState>,
    Extension(AuthenticatedActor(actor)): Extension<AuthenticatedActor>,
    Path(company_id): Path<String>,
    Json(request): Json<ResendInviteRequest>,
) -> Result<Json<InviteEnvelope>> {
    request.validate()?;

    let invite = state
        .invites
        .resend_invite(&actor, &company_id, request.into())
        .await?;

    Ok(Json(InviteEnvelope {
        invite: InviteResponse::from(invite),
    }))
}

async fn list_invites(
    State(state): State<AppState>,
    Extension(AuthenticatedActor(actor)): Extension<AuthenticatedActor>,
    Path(company_id): Path<String>,
) -> Result<Json<InviteListResponse>> {
    let now = state.clock.now();
    let invites = state
        .invites
        .list_company_invites(&actor, &company_id)
        .await?
        .into_iter()
        .map(|invite| InviteResponse::at(invite, now))
        .collect();

    Ok(Json(InviteListResponse { invites }))
}

async fn delete_employee(
    State(state): State<AppState>,
    Extension(AuthenticatedActor(actor)): Extension<AuthenticatedActor>,
    Path((company_id, employee_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    state.employees.require_company(&company_id).await?;
    state
        .employees
        .require_company_admin(&actor, &company_id, "Only company admins can delete employees")
        .await?;

    state
        .employees
        .delete_employee(&company_id, &employee_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
