//! Invite lifecycle tests against the service layer
//!
//! Covers issuing, lazy expiry, resending and accepting invites, including
//! rollback when the email cannot be delivered and concurrent acceptance.

use chrono::Duration;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};

mod common;
use common::{seed_customer, seed_employee, TestContext, STOREFRONT_URL};

use employee_invites::error::AppError;
use employee_invites::models::prelude::*;
use employee_invites::models::{auth_identity, employee, employee_invite, provider_identity};
use employee_invites::services::accounts::CredentialOutcome;
use employee_invites::services::invites::{NewInvite, ResendInvite};
use employee_invites::services::{Actor, Clock};

fn alice() -> NewInvite {
    NewInvite {
        email: "alice@example.com".to_string(),
        first_name: "Alice".to_string(),
        last_name: "Smith".to_string(),
    }
}

async fn issue_alice(ctx: &TestContext) -> employee_invite::Model {
    ctx.state
        .invites
        .invite_employee(&ctx.admin_actor(), &ctx.company.id, alice())
        .await
        .expect("invite should be issued")
}

async fn invite_count(ctx: &TestContext) -> u64 {
    EmployeeInvite::find().count(&ctx.db).await.unwrap()
}

// ============================================================================
// Issuer
// ============================================================================

#[tokio::test]
async fn test_issue_creates_pending_invite_with_seven_day_expiry() {
    let ctx = TestContext::new().await;
    let now = ctx.clock.now();

    let invite = issue_alice(&ctx).await;

    assert_eq!(invite.status, "pending");
    assert_eq!(invite.company_id, ctx.company.id);
    assert_eq!(invite.inviter_id, ctx.admin_customer.id);
    assert!((invite.expires_at - now - Duration::days(7)).num_milliseconds().abs() < 1);
    assert_eq!(invite.token.len(), 64);
    assert!(invite.token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_issue_sends_email_with_link_and_expiry_notice() {
    let ctx = TestContext::new().await;

    let invite = issue_alice(&ctx).await;

    let sent = ctx.emails.sent();
    assert_eq!(sent.len(), 1);
    let message = &sent[0];
    assert_eq!(message.to, "alice@example.com");
    assert!(message.subject.contains("Acme Corp"));
    assert!(message
        .text
        .contains(&format!("{}/invite/{}", STOREFRONT_URL, invite.token)));
    assert!(message.text.contains("Bob Boss"));
    assert!(message.text.contains("expire in 7 days"));
    assert_eq!(ctx.emails.last_token(), invite.token);
}

#[tokio::test]
async fn test_failed_email_rolls_back_invite_record() {
    let ctx = TestContext::new().await;
    ctx.emails.set_failing(true);

    let result = ctx
        .state
        .invites
        .invite_employee(&ctx.admin_actor(), &ctx.company.id, alice())
        .await;

    assert!(
        matches!(result, Err(AppError::Internal(ref msg)) if msg == "Failed to send employee invitation")
    );
    assert_eq!(invite_count(&ctx).await, 0);
}

#[tokio::test]
async fn test_pending_invite_blocks_duplicate_until_it_expires() {
    let ctx = TestContext::new().await;
    let first = issue_alice(&ctx).await;

    let duplicate = ctx
        .state
        .invites
        .invite_employee(&ctx.admin_actor(), &ctx.company.id, alice())
        .await;
    match duplicate {
        Err(AppError::InvitePending {
            invite_id,
            expires_at,
        }) => {
            assert_eq!(invite_id, first.id);
            assert_eq!(expires_at, first.expires_at);
        }
        other => panic!("expected InvitePending, got {:?}", other.map(|i| i.id)),
    }

    ctx.clock.advance(Duration::days(8));
    let second = issue_alice(&ctx).await;
    assert_ne!(second.id, first.id);
    assert_ne!(second.token, first.token);
}

#[tokio::test]
async fn test_email_comparison_ignores_case() {
    let ctx = TestContext::new().await;
    issue_alice(&ctx).await;

    let shouting = NewInvite {
        email: "  ALICE@Example.com ".to_string(),
        ..alice()
    };
    let result = ctx
        .state
        .invites
        .invite_employee(&ctx.admin_actor(), &ctx.company.id, shouting)
        .await;
    assert!(matches!(result, Err(AppError::InvitePending { .. })));
}

#[tokio::test]
async fn test_existing_employee_cannot_be_invited() {
    let ctx = TestContext::new().await;

    let result = ctx
        .state
        .invites
        .invite_employee(
            &ctx.admin_actor(),
            &ctx.company.id,
            NewInvite {
                email: ctx.admin_customer.email.clone(),
                ..alice()
            },
        )
        .await;

    assert!(
        matches!(result, Err(AppError::BadRequest(ref msg)) if msg == "This email is already an employee of the company")
    );
}

#[tokio::test]
async fn test_non_admin_employee_cannot_invite() {
    let ctx = TestContext::new().await;
    let staff = seed_customer(&ctx.db, "staff@acme.test", "Sam", "Staff").await;
    seed_employee(&ctx.db, &ctx.company.id, &staff.id, false).await;

    let result = ctx
        .state
        .invites
        .invite_employee(&Actor::Customer(staff), &ctx.company.id, alice())
        .await;

    assert!(
        matches!(result, Err(AppError::Forbidden(ref msg)) if msg == "Only company admins can invite employees")
    );
}

#[tokio::test]
async fn test_outsider_cannot_invite() {
    let ctx = TestContext::new().await;
    let outsider = seed_customer(&ctx.db, "mallory@evil.test", "Mallory", "M").await;

    let result = ctx
        .state
        .invites
        .invite_employee(&Actor::Customer(outsider), &ctx.company.id, alice())
        .await;

    assert!(
        matches!(result, Err(AppError::Forbidden(ref msg)) if msg == "You are not an employee of this company")
    );
}

#[tokio::test]
async fn test_platform_admin_can_invite() {
    let ctx = TestContext::new().await;

    let invite = ctx
        .state
        .invites
        .invite_employee(&ctx.platform_actor(), &ctx.company.id, alice())
        .await
        .unwrap();

    assert_eq!(invite.inviter_id, ctx.platform_admin.id);
    assert!(ctx.emails.sent()[0].text.contains("Platform Admin"));
}

#[tokio::test]
async fn test_unknown_company_is_not_found() {
    let ctx = TestContext::new().await;

    let result = ctx
        .state
        .invites
        .invite_employee(&ctx.platform_actor(), "comp_missing", alice())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

// ============================================================================
// Resolver
// ============================================================================

#[tokio::test]
async fn test_resolve_unknown_token_is_not_found() {
    let ctx = TestContext::new().await;

    let result = ctx.state.invites.resolve("deadbeef").await;

    assert!(matches!(result, Err(AppError::NotFound(ref msg)) if msg == "Invitation not found"));
}

#[tokio::test]
async fn test_resolve_token_is_case_sensitive() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;

    let result = ctx
        .state
        .invites
        .resolve(&invite.token.to_uppercase())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_pending_invite_returns_company() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;

    let resolved = ctx.state.invites.resolve(&invite.token).await.unwrap();

    assert_eq!(resolved.status(), InviteStatus::Pending);
    assert_eq!(resolved.invite.id, invite.id);
    assert_eq!(resolved.company.unwrap().name, "Acme Corp");
}

#[tokio::test]
async fn test_resolve_rewrites_overdue_invite_to_expired_once() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;
    ctx.clock.advance(Duration::days(8));

    let first = ctx.state.invites.resolve(&invite.token).await.unwrap();
    assert_eq!(first.status(), InviteStatus::Expired);

    let stored = EmployeeInvite::find_by_id(invite.id.clone())
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "expired");
    let rewritten_at = stored.updated_at;

    // A second resolution sees the stored state and writes nothing
    ctx.clock.advance(Duration::hours(1));
    let second = ctx.state.invites.resolve(&invite.token).await.unwrap();
    assert_eq!(second.status(), InviteStatus::Expired);
    let stored = EmployeeInvite::find_by_id(invite.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.updated_at, rewritten_at);
}

// ============================================================================
// Acceptor
// ============================================================================

#[tokio::test]
async fn test_accept_creates_employee_and_login() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;

    let accepted = ctx
        .state
        .invites
        .accept(&invite.token, "s3cret-password")
        .await
        .unwrap();

    assert_eq!(accepted.employee.company_id, ctx.company.id);
    assert_eq!(accepted.employee.spending_limit, 0);
    assert!(!accepted.employee.is_admin);
    assert_eq!(accepted.invite.status, "accepted");
    let accepted_at = accepted.invite.accepted_at.expect("accepted_at should be set");
    assert!((accepted_at - ctx.clock.now()).num_milliseconds().abs() < 1);

    let customer = ctx
        .state
        .accounts
        .authenticate_customer("alice@example.com", "s3cret-password")
        .await
        .unwrap()
        .expect("new credentials should log in");
    assert_eq!(customer.id, accepted.employee.customer_id);
    assert_eq!(customer.first_name, "Alice");
    assert!(customer.has_account);

    let wrong = ctx
        .state
        .accounts
        .authenticate_customer("alice@example.com", "not-the-password")
        .await
        .unwrap();
    assert!(wrong.is_none());
}

#[tokio::test]
async fn test_accept_twice_reports_already_used() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;

    ctx.state
        .invites
        .accept(&invite.token, "s3cret-password")
        .await
        .unwrap();
    let second = ctx
        .state
        .invites
        .accept(&invite.token, "another-password")
        .await;

    assert!(
        matches!(second, Err(AppError::BadRequest(ref msg)) if msg == "This invitation has already been used")
    );
    let employees = Employee::find()
        .filter(employee::Column::CompanyId.eq(ctx.company.id.as_str()))
        .count(&ctx.db)
        .await
        .unwrap();
    assert_eq!(employees, 2);
}

#[tokio::test]
async fn test_concurrent_accepts_create_one_employee() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;

    let (a, b) = tokio::join!(
        ctx.state.invites.accept(&invite.token, "password-one"),
        ctx.state.invites.accept(&invite.token, "password-two"),
    );

    assert_eq!(
        [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "exactly one acceptance should win"
    );
    let loser = if a.is_ok() { b } else { a };
    assert!(
        matches!(loser, Err(AppError::BadRequest(ref msg)) if msg == "This invitation has already been used")
    );

    let employees = Employee::find()
        .filter(employee::Column::CompanyId.eq(ctx.company.id.as_str()))
        .filter(employee::Column::IsAdmin.eq(false))
        .count(&ctx.db)
        .await
        .unwrap();
    assert_eq!(employees, 1);
}

#[tokio::test]
async fn test_accept_after_deadline_reports_expired() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;
    ctx.clock.advance(Duration::days(8));

    let resolved = ctx.state.invites.resolve(&invite.token).await.unwrap();
    assert_eq!(resolved.status(), InviteStatus::Expired);

    let result = ctx
        .state
        .invites
        .accept(&invite.token, "s3cret-password")
        .await;
    assert!(
        matches!(result, Err(AppError::BadRequest(ref msg)) if msg == "This invitation has expired")
    );
}

#[tokio::test]
async fn test_accept_without_prior_resolve_still_expires() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;
    ctx.clock.advance(Duration::days(7) + Duration::seconds(1));

    let result = ctx
        .state
        .invites
        .accept(&invite.token, "s3cret-password")
        .await;

    assert!(
        matches!(result, Err(AppError::BadRequest(ref msg)) if msg == "This invitation has expired")
    );
    let stored = EmployeeInvite::find_by_id(invite.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "expired");
}

#[tokio::test]
async fn test_accept_in_last_second_before_deadline_succeeds() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;
    ctx.clock.set(invite.expires_at - Duration::seconds(1));

    let accepted = ctx
        .state
        .invites
        .accept(&invite.token, "s3cret-password")
        .await
        .expect("invite is still valid");

    assert_eq!(accepted.invite.status, "accepted");
}

#[tokio::test]
async fn test_accept_unknown_token_is_invalid_link() {
    let ctx = TestContext::new().await;

    let result = ctx.state.invites.accept("nope", "s3cret-password").await;

    assert!(
        matches!(result, Err(AppError::NotFound(ref msg)) if msg == "Invalid or expired invitation link")
    );
}

#[tokio::test]
async fn test_accept_unknown_token_reports_not_found_before_password_rules() {
    let ctx = TestContext::new().await;

    let result = ctx.state.invites.accept("no-such-token", "short").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_accept_rejects_short_password() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;

    let result = ctx.state.invites.accept(&invite.token, "short").await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    let stored = EmployeeInvite::find_by_id(invite.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "pending");
}

#[tokio::test]
async fn test_accept_updates_existing_customer_in_place() {
    let ctx = TestContext::new().await;
    let existing = seed_customer(&ctx.db, "alice@example.com", "Al", "Old").await;
    let invite = issue_alice(&ctx).await;

    let accepted = ctx
        .state
        .invites
        .accept(&invite.token, "s3cret-password")
        .await
        .unwrap();

    assert_eq!(accepted.employee.customer_id, existing.id);
    let customer = Customer::find_by_id(existing.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.first_name, "Alice");
    assert_eq!(customer.last_name, "Smith");
}

#[tokio::test]
async fn test_accept_replaces_stale_credentials() {
    let ctx = TestContext::new().await;

    // Earlier membership: accepted, then the employee was removed
    let first = issue_alice(&ctx).await;
    let accepted = ctx
        .state
        .invites
        .accept(&first.token, "old-password")
        .await
        .unwrap();
    ctx.state
        .employees
        .delete_employee(&ctx.company.id, &accepted.employee.id)
        .await
        .unwrap();

    let second = issue_alice(&ctx).await;
    ctx.state
        .invites
        .accept(&second.token, "new-password")
        .await
        .unwrap();

    let credentials = ProviderIdentity::find()
        .filter(provider_identity::Column::EntityId.eq("alice@example.com"))
        .count(&ctx.db)
        .await
        .unwrap();
    assert_eq!(credentials, 1);

    let accounts = &ctx.state.accounts;
    assert!(accounts
        .authenticate_customer("alice@example.com", "new-password")
        .await
        .unwrap()
        .is_some());
    assert!(accounts
        .authenticate_customer("alice@example.com", "old-password")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_duplicate_credential_is_reported_and_leaves_no_orphan() {
    let ctx = TestContext::new().await;
    let carol = seed_customer(&ctx.db, "carol@example.com", "Carol", "Jones").await;
    let accounts = &ctx.state.accounts;

    let first = accounts
        .issue_credentials(&ctx.db, &carol, "first-hash")
        .await
        .unwrap();
    assert!(matches!(first, CredentialOutcome::Created { .. }));

    let txn = ctx.db.begin().await.unwrap();
    let second = accounts
        .issue_credentials(&txn, &carol, "second-hash")
        .await
        .unwrap();
    assert_eq!(second, CredentialOutcome::AlreadyExists);
    // The outer transaction is still usable after the savepoint rollback
    txn.commit().await.unwrap();

    let identities = AuthIdentity::find()
        .filter(auth_identity::Column::CustomerId.eq(carol.id.as_str()))
        .count(&ctx.db)
        .await
        .unwrap();
    assert_eq!(identities, 1);

    let credential = ProviderIdentity::find()
        .filter(provider_identity::Column::EntityId.eq("carol@example.com"))
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(credential.password_hash, "first-hash");
}

#[tokio::test]
async fn test_accept_recreates_customer_when_update_is_rejected() {
    let ctx = TestContext::new().await;
    let stale = seed_customer(&ctx.db, "alice@example.com", "Old", "Name").await;
    ctx.db
        .execute_unprepared(
            "CREATE TRIGGER reject_customer_update BEFORE UPDATE ON customers \
             WHEN NEW.last_name = 'Locked' \
             BEGIN SELECT RAISE(ABORT, 'customer is locked'); END;",
        )
        .await
        .unwrap();

    let invite = ctx
        .state
        .invites
        .invite_employee(
            &ctx.admin_actor(),
            &ctx.company.id,
            NewInvite {
                last_name: "Locked".to_string(),
                ..alice()
            },
        )
        .await
        .unwrap();

    let accepted = ctx
        .state
        .invites
        .accept(&invite.token, "s3cret-password")
        .await
        .expect("acceptance falls back to recreating the customer");

    assert_ne!(accepted.employee.customer_id, stale.id);
    assert!(Customer::find_by_id(stale.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .is_none());

    let recreated = Customer::find_by_id(accepted.employee.customer_id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recreated.email, "alice@example.com");
    assert_eq!(recreated.first_name, "Alice");
    assert_eq!(recreated.last_name, "Locked");
    assert!(recreated.has_account);
}

// ============================================================================
// Resender
// ============================================================================

#[tokio::test]
async fn test_resend_expires_old_invite_and_issues_new_one() {
    let ctx = TestContext::new().await;
    let old = issue_alice(&ctx).await;

    let new = ctx
        .state
        .invites
        .resend_invite(
            &ctx.admin_actor(),
            &ctx.company.id,
            ResendInvite {
                invite_id: old.id.clone(),
                invitee: NewInvite {
                    first_name: "Alicia".to_string(),
                    ..alice()
                },
            },
        )
        .await
        .unwrap();

    assert_ne!(new.id, old.id);
    assert_ne!(new.token, old.token);
    assert_eq!(new.status, "pending");
    assert_eq!(new.first_name, "Alicia");

    let old = EmployeeInvite::find_by_id(old.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(old.status, "expired");

    // The superseded link is dead, the new one works
    assert!(ctx
        .state
        .invites
        .accept(&old.token, "s3cret-password")
        .await
        .is_err());
    assert_eq!(ctx.emails.sent().len(), 2);
    assert_eq!(ctx.emails.last_token(), new.token);
}

#[tokio::test]
async fn test_resend_accepted_invite_is_rejected() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;
    ctx.state
        .invites
        .accept(&invite.token, "s3cret-password")
        .await
        .unwrap();

    let result = ctx
        .state
        .invites
        .resend_invite(
            &ctx.admin_actor(),
            &ctx.company.id,
            ResendInvite {
                invite_id: invite.id,
                invitee: alice(),
            },
        )
        .await;

    assert!(
        matches!(result, Err(AppError::BadRequest(ref msg)) if msg == "This invitation has already been accepted")
    );
}

#[tokio::test]
async fn test_resend_with_failed_email_restores_old_invite() {
    let ctx = TestContext::new().await;
    let old = issue_alice(&ctx).await;
    ctx.emails.set_failing(true);

    let result = ctx
        .state
        .invites
        .resend_invite(
            &ctx.admin_actor(),
            &ctx.company.id,
            ResendInvite {
                invite_id: old.id.clone(),
                invitee: alice(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert_eq!(invite_count(&ctx).await, 1);
    let stored = EmployeeInvite::find_by_id(old.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "pending");
}

#[tokio::test]
async fn test_resend_invite_from_other_company_is_not_found() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;
    let other = common::seed_company(&ctx.db, "Other Inc").await;

    let result = ctx
        .state
        .invites
        .resend_invite(
            &ctx.platform_actor(),
            &other.id,
            ResendInvite {
                invite_id: invite.id,
                invitee: alice(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_resending_superseded_invite_again_is_refused() {
    let ctx = TestContext::new().await;
    let old = issue_alice(&ctx).await;
    let admin = ctx.admin_actor();
    let request = ResendInvite {
        invite_id: old.id.clone(),
        invitee: alice(),
    };

    let first = ctx
        .state
        .invites
        .resend_invite(&admin, &ctx.company.id, request.clone())
        .await
        .unwrap();
    let second = ctx
        .state
        .invites
        .resend_invite(&admin, &ctx.company.id, request)
        .await;

    match second {
        Err(AppError::InvitePending { invite_id, .. }) => assert_eq!(invite_id, first.id),
        other => panic!("expected pending invite error, got {:?}", other),
    }
    let pending = EmployeeInvite::find()
        .filter(employee_invite::Column::Email.eq("alice@example.com"))
        .filter(employee_invite::Column::Status.eq("pending"))
        .count(&ctx.db)
        .await
        .unwrap();
    assert_eq!(pending, 1);
    assert_eq!(ctx.emails.sent().len(), 2);
}

#[tokio::test]
async fn test_resend_to_existing_employee_email_is_refused() {
    let ctx = TestContext::new().await;
    let old = issue_alice(&ctx).await;

    let result = ctx
        .state
        .invites
        .resend_invite(
            &ctx.admin_actor(),
            &ctx.company.id,
            ResendInvite {
                invite_id: old.id.clone(),
                invitee: NewInvite {
                    email: "Boss@Acme.test".to_string(),
                    ..alice()
                },
            },
        )
        .await;

    assert!(
        matches!(result, Err(AppError::BadRequest(ref msg)) if msg == "This email is already an employee of the company")
    );
    let stored = EmployeeInvite::find_by_id(old.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "pending");
    assert_eq!(invite_count(&ctx).await, 1);
}

// ============================================================================
// Expiry sweep and listing
// ============================================================================

#[tokio::test]
async fn test_expire_overdue_sweeps_only_overdue_pending() {
    let ctx = TestContext::new().await;
    let overdue = issue_alice(&ctx).await;
    ctx.clock.advance(Duration::days(5));
    let fresh = ctx
        .state
        .invites
        .invite_employee(
            &ctx.admin_actor(),
            &ctx.company.id,
            NewInvite {
                email: "carol@example.com".to_string(),
                ..alice()
            },
        )
        .await
        .unwrap();
    ctx.clock.advance(Duration::days(3));

    let swept = ctx.state.invites.expire_overdue().await.unwrap();
    assert_eq!(swept, 1);
    assert_eq!(ctx.state.invites.expire_overdue().await.unwrap(), 0);

    let statuses: Vec<(String, String)> = EmployeeInvite::find()
        .all(&ctx.db)
        .await
        .unwrap()
        .into_iter()
        .map(|i| (i.id, i.status))
        .collect();
    assert!(statuses.contains(&(overdue.id, "expired".to_string())));
    assert!(statuses.contains(&(fresh.id, "pending".to_string())));
}

#[tokio::test]
async fn test_list_company_invites_requires_admin() {
    let ctx = TestContext::new().await;
    issue_alice(&ctx).await;
    let staff = seed_customer(&ctx.db, "staff@acme.test", "Sam", "Staff").await;
    seed_employee(&ctx.db, &ctx.company.id, &staff.id, false).await;

    let listed = ctx
        .state
        .invites
        .list_company_invites(&ctx.admin_actor(), &ctx.company.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let denied = ctx
        .state
        .invites
        .list_company_invites(&Actor::Customer(staff), &ctx.company.id)
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
}

// ============================================================================
// Employee deletion
// ============================================================================

#[tokio::test]
async fn test_deleted_employee_can_be_invited_again() {
    let ctx = TestContext::new().await;
    let invite = issue_alice(&ctx).await;
    let accepted = ctx
        .state
        .invites
        .accept(&invite.token, "s3cret-password")
        .await
        .unwrap();

    ctx.state
        .employees
        .delete_employee(&ctx.company.id, &accepted.employee.id)
        .await
        .unwrap();

    let deleted = Employee::find_by_id(accepted.employee.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert!(deleted.deleted_at.is_some());

    issue_alice(&ctx).await;
}

#[tokio::test]
async fn test_admin_employee_cannot_be_deleted() {
    let ctx = TestContext::new().await;

    let result = ctx
        .state
        .employees
        .delete_employee(&ctx.company.id, &ctx.admin_employee.id)
        .await;

    assert!(
        matches!(result, Err(AppError::BadRequest(ref msg)) if msg == "Cannot delete admin employees")
    );
}

#[tokio::test]
async fn test_deleting_employee_twice_is_not_found() {
    let ctx = TestContext::new().await;
    let dave = seed_customer(&ctx.db, "dave@example.com", "Dave", "Lee").await;
    let member = seed_employee(&ctx.db, &ctx.company.id, &dave.id, false).await;
    ctx.clock.advance(Duration::minutes(5));

    ctx.state
        .employees
        .delete_employee(&ctx.company.id, &member.id)
        .await
        .unwrap();
    let again = ctx
        .state
        .employees
        .delete_employee(&ctx.company.id, &member.id)
        .await;

    assert!(matches!(again, Err(AppError::NotFound(_))));
    let stored = Employee::find_by_id(member.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    let deleted_at = stored.deleted_at.expect("soft deleted");
    assert!((deleted_at - ctx.clock.now()).num_milliseconds().abs() < 1);
    assert!((stored.updated_at - ctx.clock.now()).num_milliseconds().abs() < 1);
}
