use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, TransactionTrait};

use super::{mark_expired_if_overdue, InviteService};
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{employee, employee_invite};
use crate::services::accounts::CredentialOutcome;

/// Shortest password accepted when creating an account from an invite
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Result of a successful acceptance
#[derive(Debug, Clone)]
pub struct AcceptedInvite {
    pub invite: employee_invite::Model,
    pub employee: employee::Model,
}

impl InviteService {
    /// Accept an invite: provision the customer account and login, create the
    /// employee, and mark the invite accepted.
    ///
    /// Provisioning runs in a single transaction that starts by claiming the
    /// invite (`pending -> accepted` while unexpired). A second concurrent
    /// acceptance finds nothing to claim and is told the invite was used.
    /// Individual steps also tolerate leftovers from earlier failed attempts.
    pub async fn accept(&self, token: &str, password: &str) -> Result<AcceptedInvite> {
        let invite = self
            .find_by_token(token)
            .await?
            .ok_or_else(invalid_link)?;

        let now = self.clock.now();
        match invite.stored_status() {
            InviteStatus::Accepted => return Err(already_used()),
            InviteStatus::Expired => return Err(expired()),
            InviteStatus::Pending => {}
        }
        if invite.is_past_deadline(now) {
            mark_expired_if_overdue(&self.db, &invite.id, now).await?;
            return Err(expired());
        }

        // Checked once the link is known to be usable, so a bad link is always a 404
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let password_hash = self.accounts.hash_password(password).await?;

        match self.provision(&invite, &password_hash, now).await {
            Ok(accepted) => {
                tracing::info!(
                    invite_id = %accepted.invite.id,
                    employee_id = %accepted.employee.id,
                    company_id = %accepted.employee.company_id,
                    "Invite accepted"
                );
                Ok(accepted)
            }
            Err(e @ (AppError::BadRequest(_) | AppError::NotFound(_))) => Err(e),
            Err(e) => {
                tracing::error!(invite_id = %invite.id, error = %e, "Failed to accept invitation");
                Err(AppError::Internal("Failed to accept invitation".to_string()))
            }
        }
    }

    async fn provision(
        &self,
        invite: &employee_invite::Model,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<AcceptedInvite> {
        let txn = self.db.begin().await?;

        if !claim(&txn, &invite.id, now).await? {
            txn.rollback().await?;
            return Err(self.explain_lost_claim(&invite.id, now).await?);
        }

        let customer = self.accounts.upsert_customer_for_invite(&txn, invite).await?;

        let removed = self.accounts.revoke_credentials(&txn, &invite.email).await?;
        if removed > 0 {
            tracing::debug!(invite_id = %invite.id, removed, "Replaced previous credentials");
        }

        if self
            .accounts
            .issue_credentials(&txn, &customer, password_hash)
            .await?
            == CredentialOutcome::AlreadyExists
        {
            tracing::warn!(invite_id = %invite.id, "Credential created concurrently, keeping it");
        }

        let employee = match self
            .employees
            .find_active_for_customer(&txn, &invite.company_id, &customer.id)
            .await?
        {
            Some(existing) => existing,
            None => {
                self.employees
                    .create_employee(&txn, &invite.company_id, &customer.id, now)
                    .await?
            }
        };

        let invite = EmployeeInvite::find_by_id(invite.id.clone())
            .one(&txn)
            .await?
            .ok_or_else(invalid_link)?;

        txn.commit().await?;
        Ok(AcceptedInvite { invite, employee })
    }

    /// Why the conditional claim matched no row
    async fn explain_lost_claim(&self, invite_id: &str, now: DateTime<Utc>) -> Result<AppError> {
        let Some(current) = EmployeeInvite::find_by_id(invite_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(invalid_link());
        };

        Ok(match current.stored_status() {
            InviteStatus::Pending if current.is_past_deadline(now) => {
                mark_expired_if_overdue(&self.db, invite_id, now).await?;
                expired()
            }
            InviteStatus::Expired => expired(),
            _ => already_used(),
        })
    }
}

/// `pending -> accepted` if still pending and unexpired
async fn claim(txn: &DatabaseTransaction, invite_id: &str, now: DateTime<Utc>) -> Result<bool> {
    let result = EmployeeInvite::update_many()
        .col_expr(
            employee_invite::Column::Status,
            Expr::value(InviteStatus::Accepted.as_str()),
        )
        .col_expr(employee_invite::Column::AcceptedAt, Expr::value(now))
        .col_expr(employee_invite::Column::UpdatedAt, Expr::value(now))
        .filter(employee_invite::Column::Id.eq(invite_id))
        .filter(employee_invite::Column::Status.eq(InviteStatus::Pending.as_str()))
        .filter(employee_invite::Column::ExpiresAt.gte(now))
        .filter(employee_invite::Column::DeletedAt.is_null())
        .exec(txn)
        .await?;
    Ok(result.rows_affected == 1)
}

fn invalid_link() -> AppError {
    AppError::NotFound("Invalid or expired invitation link".to_string())
}

fn already_used() -> AppError {
    AppError::BadRequest("This invitation has already been used".to_string())
}

fn expired() -> AppError {
    AppError::BadRequest("This invitation has expired".to_string())
}
