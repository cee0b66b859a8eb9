use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{company, employee_invite};
use crate::services::invites::{NewInvite, ResendInvite, ResolvedInvite};

/// Names are stored trimmed, so whitespace alone counts as missing
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Missing fields deserialize as empty strings so validation reports them as 400s
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteEmployeeRequest {
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
}

impl From<InviteEmployeeRequest> for NewInvite {
    fn from(req: InviteEmployeeRequest) -> Self {
        NewInvite {
            email: req.email,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendInviteRequest {
    #[serde(default, rename = "inviteId", alias = "invite_id")]
    #[validate(length(min = 1))]
    pub invite_id: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
}

impl From<ResendInviteRequest> for ResendInvite {
    fn from(req: ResendInviteRequest) -> Self {
        ResendInvite {
            invite_id: req.invite_id,
            invitee: NewInvite {
                email: req.email,
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AcceptInviteRequest {
    /// Length rules are applied by the acceptor once the token is known to be valid
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyRef {
    pub id: String,
    pub name: String,
}

impl From<company::Model> for CompanyRef {
    fn from(c: company::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

/// Public view of an invite. The token is never part of it.
#[derive(Debug, Clone, Serialize)]
pub struct InviteResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyRef>,
    pub inviter_id: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl InviteResponse {
    /// View with the status as of `now`
    pub fn at(invite: employee_invite::Model, now: DateTime<Utc>) -> Self {
        let status = invite.effective_status(now).as_str().to_string();
        Self {
            status,
            ..Self::from(invite)
        }
    }
}

impl From<employee_invite::Model> for InviteResponse {
    fn from(invite: employee_invite::Model) -> Self {
        Self {
            id: invite.id,
            email: invite.email,
            first_name: invite.first_name,
            last_name: invite.last_name,
            company_id: invite.company_id,
            company: None,
            inviter_id: invite.inviter_id,
            status: invite.status,
            expires_at: invite.expires_at,
            accepted_at: invite.accepted_at,
            created_at: invite.created_at,
        }
    }
}

impl From<ResolvedInvite> for InviteResponse {
    fn from(resolved: ResolvedInvite) -> Self {
        Self {
            company: resolved.company.map(CompanyRef::from),
            ..Self::from(resolved.invite)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InviteEnvelope {
    pub invite: InviteResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct InviteListResponse {
    pub invites: Vec<InviteResponse>,
}
