use super::{mark_expired_if_overdue, InviteService};
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{company, employee_invite};

/// An invite looked up by its token, with its status brought up to date
#[derive(Debug, Clone)]
pub struct ResolvedInvite {
    pub invite: employee_invite::Model,
    pub company: Option<company::Model>,
}

impl ResolvedInvite {
    pub fn status(&self) -> InviteStatus {
        self.invite.stored_status()
    }
}

impl InviteService {
    /// Look up an invite by token (exact, case-sensitive match).
    ///
    /// A pending invite found past its deadline is rewritten to expired before
    /// it is returned. The rewrite is conditional on the row still being
    /// pending, so concurrent resolutions are harmless.
    pub async fn resolve(&self, token: &str) -> Result<ResolvedInvite> {
        let mut invite = self
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

        let now = self.clock.now();
        if invite.stored_status() == InviteStatus::Pending && invite.is_past_deadline(now) {
            mark_expired_if_overdue(&self.db, &invite.id, now).await?;
            invite.status = InviteStatus::Expired.as_str().to_string();
        }

        let company = self.find_company(&invite.company_id).await?;
        Ok(ResolvedInvite { invite, company })
    }
}
