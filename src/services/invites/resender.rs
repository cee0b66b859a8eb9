use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use super::issuer::issue_failed;
use super::{InviteService, NewInvite};
use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::employee_invite;
use crate::models::prelude::*;
use crate::services::accounts::{normalize_email, Actor};
use crate::services::saga::{Compensate, Saga, StepResponse};

/// Resend request: the invite to supersede plus the (possibly corrected) invitee
#[derive(Debug, Clone)]
pub struct ResendInvite {
    pub invite_id: String,
    pub invitee: NewInvite,
}

impl InviteService {
    /// Supersede an invite: force it to expired, then issue a fresh one.
    ///
    /// The old and new records are linked only by email and company. The new
    /// email must pass the same checks as a direct invite. If the new invite
    /// cannot be delivered the old one gets its previous status back.
    pub async fn resend_invite(
        &self,
        actor: &Actor,
        company_id: &str,
        request: ResendInvite,
    ) -> Result<employee_invite::Model> {
        let company = self.employees.require_company(company_id).await?;
        self.employees
            .require_company_admin(actor, company_id, "Only company admins can resend invites")
            .await?;

        let previous = EmployeeInvite::find_by_id(request.invite_id.clone())
            .filter(employee_invite::Column::CompanyId.eq(company_id))
            .filter(employee_invite::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

        if previous.stored_status() == InviteStatus::Accepted {
            return Err(already_accepted());
        }

        let invitee = NewInvite {
            email: normalize_email(&request.invitee.email),
            ..request.invitee
        };
        self.ensure_invitable(company_id, &invitee.email, Some(&previous.id))
            .await?;

        let mut saga = Saga::new("resend_employee_invite");
        let result = async {
            saga.run_step("expire_previous_invite", self.supersede(&previous))
                .await?;
            self.issue(&mut saga, actor, &company, &invitee).await
        }
        .await;

        match result {
            Ok(model) => {
                saga.complete();
                tracing::info!(
                    previous_invite_id = %previous.id,
                    invite_id = %model.id,
                    "Employee invite resent"
                );
                Ok(model)
            }
            Err(e) => Err(issue_failed(e)),
        }
    }

    /// Conditional `pending|expired -> expired`. Losing to a concurrent acceptance is a 400.
    async fn supersede(&self, previous: &employee_invite::Model) -> Result<StepResponse<()>> {
        let now = self.clock.now();
        let result = EmployeeInvite::update_many()
            .col_expr(
                employee_invite::Column::Status,
                Expr::value(InviteStatus::Expired.as_str()),
            )
            .col_expr(employee_invite::Column::UpdatedAt, Expr::value(now))
            .filter(employee_invite::Column::Id.eq(previous.id.as_str()))
            .filter(employee_invite::Column::Status.ne(InviteStatus::Accepted.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(already_accepted());
        }

        Ok(StepResponse::new(
            (),
            RestoreInviteStatus {
                db: self.db.clone(),
                invite_id: previous.id.clone(),
                status: previous.status.clone(),
            },
        ))
    }
}

fn already_accepted() -> AppError {
    AppError::BadRequest("This invitation has already been accepted".to_string())
}

/// Undo for `expire_previous_invite`
struct RestoreInviteStatus {
    db: DbConn,
    invite_id: String,
    status: String,
}

#[async_trait]
impl Compensate for RestoreInviteStatus {
    fn name(&self) -> &'static str {
        "restore_invite_status"
    }

    async fn compensate(&self) -> Result<()> {
        EmployeeInvite::update_many()
            .col_expr(
                employee_invite::Column::Status,
                Expr::value(self.status.as_str()),
            )
            .filter(employee_invite::Column::Id.eq(self.invite_id.as_str()))
            .filter(employee_invite::Column::Status.eq(InviteStatus::Expired.as_str()))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
