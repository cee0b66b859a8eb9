//! Test helpers for integration tests.
//!
//! Every test gets its own in-memory SQLite database, a manual clock and an
//! email provider that records (or refuses) what it is asked to send.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tower::util::ServiceExt;

use employee_invites::db;
use employee_invites::endpoints::create_router;
use employee_invites::models::{company, customer, employee, generate_id, user};
use employee_invites::services::notification::{EmailMessage, EmailProvider, SendResult};
use employee_invites::services::security::ActorType;
use employee_invites::services::{
    Actor, InviteSettings, JwtKeys, ManualClock, NotificationService, PasswordHasher,
};
use employee_invites::state::AppState;

pub const STOREFRONT_URL: &str = "https://shop.example.com";

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    db::connect_with_url("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

/// Email provider that records messages, or fails while `fail` is set
#[derive(Clone, Default)]
pub struct RecordingEmailProvider {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingEmailProvider {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Token from the invite URL in the most recent email
    pub fn last_token(&self) -> String {
        let sent = self.sent();
        let message = sent.last().expect("no email sent");
        let marker = format!("{}/invite/", STOREFRONT_URL);
        let start = message.text.find(&marker).expect("no invite url") + marker.len();
        message.text[start..]
            .chars()
            .take_while(|c| c.is_ascii_hexdigit())
            .collect()
    }
}

#[async_trait]
impl EmailProvider for RecordingEmailProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, message: &EmailMessage) -> SendResult {
        if self.fail.load(Ordering::SeqCst) {
            return SendResult::failed("SMTP connection refused");
        }
        self.sent.lock().unwrap().push(message.clone());
        SendResult::ok()
    }
}

/// A seeded company with one admin employee and a platform administrator
pub struct TestContext {
    pub db: DatabaseConnection,
    pub state: AppState,
    pub clock: ManualClock,
    pub emails: RecordingEmailProvider,
    pub company: company::Model,
    pub admin_customer: customer::Model,
    pub admin_employee: employee::Model,
    pub platform_admin: user::Model,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = create_test_db().await;
        let clock = ManualClock::new(Utc::now());
        let emails = RecordingEmailProvider::default();

        let state = AppState::new(
            db.clone(),
            JwtKeys::new(b"test-secret", 3600),
            PasswordHasher::new(4),
            NotificationService::new(Arc::new(emails.clone())),
            Arc::new(clock.clone()),
            InviteSettings {
                storefront_url: STOREFRONT_URL.to_string(),
                ttl_days: 7,
            },
        );

        let company = seed_company(&db, "Acme Corp").await;
        let admin_customer = seed_customer(&db, "boss@acme.test", "Bob", "Boss").await;
        let admin_employee = seed_employee(&db, &company.id, &admin_customer.id, true).await;
        let platform_admin = state
            .accounts
            .ensure_admin_user("admin@platform.test", "admin-password", "Platform", "Admin")
            .await
            .expect("Failed to create platform admin");

        Self {
            db,
            state,
            clock,
            emails,
            company,
            admin_customer,
            admin_employee,
            platform_admin,
        }
    }

    pub fn app(&self) -> Router {
        create_router(self.state.clone())
    }

    pub fn admin_actor(&self) -> Actor {
        Actor::Customer(self.admin_customer.clone())
    }

    pub fn platform_actor(&self) -> Actor {
        Actor::PlatformAdmin(self.platform_admin.clone())
    }

    pub fn customer_token(&self, customer_id: &str) -> String {
        self.state
            .jwt
            .create_access_token(customer_id, ActorType::Customer)
            .unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.customer_token(&self.admin_customer.id)
    }

    pub fn platform_token(&self) -> String {
        self.state
            .jwt
            .create_access_token(&self.platform_admin.id, ActorType::User)
            .unwrap()
    }
}

pub async fn seed_company(db: &DatabaseConnection, name: &str) -> company::Model {
    let now = Utc::now();
    company::ActiveModel {
        id: Set(generate_id("comp")),
        name: Set(name.to_string()),
        email: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_customer(
    db: &DatabaseConnection,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> customer::Model {
    let now = Utc::now();
    customer::ActiveModel {
        id: Set(generate_id("cus")),
        email: Set(email.to_string()),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        has_account: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_employee(
    db: &DatabaseConnection,
    company_id: &str,
    customer_id: &str,
    is_admin: bool,
) -> employee::Model {
    let now = Utc::now();
    employee::ActiveModel {
        id: Set(generate_id("emp")),
        company_id: Set(company_id.to_string()),
        customer_id: Set(customer_id.to_string()),
        spending_limit: Set(0),
        is_admin: Set(is_admin),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await
    .unwrap()
}

/// Send a request and return (status, parsed JSON body or Null)
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub fn invitee(email: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "first_name": "Alice",
        "last_name": "Smith"
    })
}
