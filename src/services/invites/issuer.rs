use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::InviteService;
use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{company, employee_invite, generate_id};
use crate::services::accounts::{normalize_email, Actor};
use crate::services::notification::EmployeeInviteEmail;
use crate::services::saga::{Compensate, Saga, StepResponse};
use crate::services::security::{generate_invite_token, invite_expiry};

/// Who to invite
#[derive(Debug, Clone)]
pub struct NewInvite {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl InviteService {
    /// Invite someone to join a company as an employee.
    ///
    /// Refused when the email already belongs to an active employee, or when a
    /// pending invite for the same email and company has not yet expired.
    pub async fn invite_employee(
        &self,
        actor: &Actor,
        company_id: &str,
        invite: NewInvite,
    ) -> Result<employee_invite::Model> {
        let company = self.employees.require_company(company_id).await?;
        self.employees
            .require_company_admin(actor, company_id, "Only company admins can invite employees")
            .await?;

        let invite = NewInvite {
            email: normalize_email(&invite.email),
            ..invite
        };

        self.ensure_invitable(company_id, &invite.email, None).await?;

        let mut saga = Saga::new("send_employee_invite");
        let created = self.issue(&mut saga, actor, &company, &invite).await;
        match created {
            Ok(model) => {
                saga.complete();
                Ok(model)
            }
            Err(e) => Err(issue_failed(e)),
        }
    }

    /// Preconditions shared by every path that issues an invite: the email is
    /// not an active employee and has no unexpired pending invite, other than
    /// `superseding` when an existing invite is being replaced.
    pub(super) async fn ensure_invitable(
        &self,
        company_id: &str,
        email: &str,
        superseding: Option<&str>,
    ) -> Result<()> {
        if self
            .employees
            .find_active_by_email(company_id, email)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest(
                "This email is already an employee of the company".to_string(),
            ));
        }

        let now = self.clock.now();
        let mut pending = EmployeeInvite::find()
            .filter(employee_invite::Column::CompanyId.eq(company_id))
            .filter(employee_invite::Column::Email.eq(email))
            .filter(employee_invite::Column::Status.eq(InviteStatus::Pending.as_str()))
            .filter(employee_invite::Column::ExpiresAt.gte(now))
            .filter(employee_invite::Column::DeletedAt.is_null());
        if let Some(invite_id) = superseding {
            pending = pending.filter(employee_invite::Column::Id.ne(invite_id));
        }

        if let Some(pending) = pending
            .order_by_desc(employee_invite::Column::ExpiresAt)
            .one(&self.db)
            .await?
        {
            return Err(AppError::InvitePending {
                invite_id: pending.id,
                expires_at: pending.expires_at,
            });
        }
        Ok(())
    }

    /// Persist a fresh pending invite, then email it. Runs inside the caller's
    /// saga so a failed send also unwinds whatever the caller did before.
    pub(super) async fn issue(
        &self,
        saga: &mut Saga,
        actor: &Actor,
        company: &company::Model,
        invite: &NewInvite,
    ) -> Result<employee_invite::Model> {
        let record = saga
            .run_step("create_invite_record", self.create_record(actor, company, invite))
            .await?;

        let email = EmployeeInviteEmail {
            to: record.email.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            company_name: company.name.clone(),
            inviter_name: actor.display_name(),
            invite_url: self.settings.invite_url(&record.token),
            ttl_days: self.settings.ttl_days,
        };
        saga.run_step("send_invite_email", async {
            self.notification.send_employee_invite(&email).await?;
            Ok::<_, AppError>(StepResponse::final_step(()))
        })
        .await?;

        tracing::info!(
            invite_id = %record.id,
            company_id = %company.id,
            "Employee invite issued"
        );
        Ok(record)
    }

    async fn create_record(
        &self,
        actor: &Actor,
        company: &company::Model,
        invite: &NewInvite,
    ) -> Result<StepResponse<employee_invite::Model>> {
        let now = self.clock.now();
        let record = employee_invite::ActiveModel {
            id: Set(generate_id("inv")),
            email: Set(invite.email.clone()),
            first_name: Set(invite.first_name.clone()),
            last_name: Set(invite.last_name.clone()),
            company_id: Set(company.id.clone()),
            inviter_id: Set(actor.id().to_string()),
            token: Set(generate_invite_token()),
            status: Set(InviteStatus::Pending.as_str().to_string()),
            expires_at: Set(invite_expiry(now, self.settings.ttl_days)),
            accepted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        let undo = DeleteInvite {
            db: self.db.clone(),
            invite_id: record.id.clone(),
        };
        Ok(StepResponse::new(record, undo))
    }
}

/// Client errors pass through; anything else is reported generically
pub(super) fn issue_failed(err: AppError) -> AppError {
    match err {
        AppError::BadRequest(_) | AppError::NotFound(_) | AppError::Forbidden(_) => err,
        other => {
            tracing::error!(error = %other, "Failed to send employee invitation");
            AppError::Internal("Failed to send employee invitation".to_string())
        }
    }
}

/// Undo for `create_invite_record`: hard delete the row
struct DeleteInvite {
    db: DbConn,
    invite_id: String,
}

#[async_trait]
impl Compensate for DeleteInvite {
    fn name(&self) -> &'static str {
        "delete_invite_record"
    }

    async fn compensate(&self) -> Result<()> {
        EmployeeInvite::delete_by_id(self.invite_id.clone())
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
