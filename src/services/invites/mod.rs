//! Employee invitation lifecycle.
//!
//! ```text
//!            issue                      accept
//!   (none) ───────► pending ─────────────────────► accepted
//!                     │
//!                     │ deadline passed (lazy, sweep) or resend
//!                     ▼
//!                  expired
//! ```
//!
//! Every status transition is a conditional update on the current status and
//! checks `rows_affected`, so concurrent callers cannot both win.

mod acceptor;
mod issuer;
mod resender;
mod resolver;

pub use acceptor::AcceptedInvite;
pub use issuer::NewInvite;
pub use resender::ResendInvite;
pub use resolver::ResolvedInvite;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::db::DbConn;
use crate::error::Result;
use crate::models::prelude::*;
use crate::models::{company, employee_invite};
use crate::services::accounts::{AccountService, Actor};
use crate::services::clock::SharedClock;
use crate::services::employees::EmployeeService;
use crate::services::notification::NotificationService;

/// Invite link and lifetime settings
#[derive(Debug, Clone)]
pub struct InviteSettings {
    /// Storefront base URL without trailing slash
    pub storefront_url: String,
    pub ttl_days: i64,
}

impl InviteSettings {
    pub fn invite_url(&self, token: &str) -> String {
        format!("{}/invite/{}", self.storefront_url.trim_end_matches('/'), token)
    }
}

#[derive(Clone)]
pub struct InviteService {
    db: DbConn,
    accounts: AccountService,
    employees: EmployeeService,
    notification: NotificationService,
    clock: SharedClock,
    settings: InviteSettings,
}

impl InviteService {
    pub fn new(
        db: DbConn,
        accounts: AccountService,
        employees: EmployeeService,
        notification: NotificationService,
        clock: SharedClock,
        settings: InviteSettings,
    ) -> Self {
        Self {
            db,
            accounts,
            employees,
            notification,
            clock,
            settings,
        }
    }

    /// Invites of a company, newest first. Company admins and platform admins only.
    pub async fn list_company_invites(
        &self,
        actor: &Actor,
        company_id: &str,
    ) -> Result<Vec<employee_invite::Model>> {
        self.employees.require_company(company_id).await?;
        self.employees
            .require_company_admin(actor, company_id, "Only company admins can view invites")
            .await?;

        Ok(EmployeeInvite::find()
            .filter(employee_invite::Column::CompanyId.eq(company_id))
            .filter(employee_invite::Column::DeletedAt.is_null())
            .order_by_desc(employee_invite::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Rewrite every overdue pending invite to expired. Returns the number rewritten.
    pub async fn expire_overdue(&self) -> Result<u64> {
        let now = self.clock.now();
        let result = EmployeeInvite::update_many()
            .col_expr(
                employee_invite::Column::Status,
                Expr::value(InviteStatus::Expired.as_str()),
            )
            .col_expr(employee_invite::Column::UpdatedAt, Expr::value(now))
            .filter(employee_invite::Column::Status.eq(InviteStatus::Pending.as_str()))
            .filter(employee_invite::Column::ExpiresAt.lt(now))
            .filter(employee_invite::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(count = result.rows_affected, "Expired overdue invites");
        }
        Ok(result.rows_affected)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<employee_invite::Model>> {
        Ok(EmployeeInvite::find()
            .filter(employee_invite::Column::Token.eq(token))
            .filter(employee_invite::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?)
    }

    async fn find_company(&self, company_id: &str) -> Result<Option<company::Model>> {
        Ok(Company::find_by_id(company_id.to_string())
            .one(&self.db)
            .await?)
    }
}

/// Conditional `pending -> expired` for one overdue invite.
///
/// Idempotent: returns false when the row was already rewritten (or accepted)
/// by someone else.
async fn mark_expired_if_overdue<C: ConnectionTrait>(
    conn: &C,
    invite_id: &str,
    now: DateTime<Utc>,
) -> Result<bool> {
    let result = EmployeeInvite::update_many()
        .col_expr(
            employee_invite::Column::Status,
            Expr::value(InviteStatus::Expired.as_str()),
        )
        .col_expr(employee_invite::Column::UpdatedAt, Expr::value(now))
        .filter(employee_invite::Column::Id.eq(invite_id))
        .filter(employee_invite::Column::Status.eq(InviteStatus::Pending.as_str()))
        .filter(employee_invite::Column::ExpiresAt.lt(now))
        .exec(conn)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(invite_id = %invite_id, "Invite marked expired");
    }
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_url_joins_without_double_slash() {
        let settings = InviteSettings {
            storefront_url: "https://shop.example.com/".to_string(),
            ttl_days: 7,
        };
        assert_eq!(
            settings.invite_url("abc"),
            "https://shop.example.com/invite/abc"
        );
    }
}
