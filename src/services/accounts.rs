//! Customer accounts and login credentials.
//!
//! Steps 1–4 of invite acceptance live here. Every operation is generic over the
//! connection so the acceptor can run them inside its transaction, and each one
//! tolerates state left behind by an earlier, partially failed attempt.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{auth_identity, customer, employee_invite, generate_id, provider_identity, user};
use crate::services::clock::SharedClock;
use crate::services::security::PasswordHasher;

/// Provider name for email + password logins
pub const EMAILPASS_PROVIDER: &str = "emailpass";

/// Role recorded on auth identities created through invite acceptance
pub const EMPLOYEE_ROLE: &str = "employee";

/// Authenticated principal acting on the API
#[derive(Debug, Clone)]
pub enum Actor {
    PlatformAdmin(user::Model),
    Customer(customer::Model),
}

impl Actor {
    pub fn id(&self) -> &str {
        match self {
            Actor::PlatformAdmin(user) => &user.id,
            Actor::Customer(customer) => &customer.id,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Actor::PlatformAdmin(user) => user.full_name(),
            Actor::Customer(customer) => customer.full_name(),
        }
    }

    pub fn is_platform_admin(&self) -> bool {
        matches!(self, Actor::PlatformAdmin(_))
    }
}

/// Outcome of creating login credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOutcome {
    Created { auth_identity_id: String },
    /// A concurrent acceptance created the `(email, emailpass)` credential first
    AlreadyExists,
}

/// Normalise an email for storage and comparison
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AccountService {
    db: DbConn,
    hasher: PasswordHasher,
    clock: SharedClock,
}

impl AccountService {
    pub fn new(db: DbConn, hasher: PasswordHasher, clock: SharedClock) -> Self {
        Self { db, hasher, clock }
    }

    /// Hash off the async runtime; bcrypt is deliberately slow
    pub async fn hash_password(&self, password: &str) -> Result<String> {
        let hasher = self.hasher;
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    pub async fn find_user(&self, user_id: &str) -> Result<Option<user::Model>> {
        Ok(User::find_by_id(user_id.to_string()).one(&self.db).await?)
    }

    pub async fn find_customer(&self, customer_id: &str) -> Result<Option<customer::Model>> {
        Ok(Customer::find_by_id(customer_id.to_string())
            .filter(customer::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?)
    }

    /// Oldest active customer with this email
    pub async fn find_customer_by_email<C: ConnectionTrait>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<customer::Model>> {
        Ok(Customer::find()
            .filter(customer::Column::Email.eq(normalize_email(email)))
            .filter(customer::Column::DeletedAt.is_null())
            .order_by_asc(customer::Column::CreatedAt)
            .one(conn)
            .await?)
    }

    pub async fn create_customer<C: ConnectionTrait>(
        &self,
        conn: &C,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<customer::Model> {
        let now = self.clock.now();
        let new_customer = customer::ActiveModel {
            id: Set(generate_id("cus")),
            email: Set(normalize_email(email)),
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            has_account: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };
        Ok(new_customer.insert(conn).await?)
    }

    // ------------------------------------------------------------------------
    // Invite acceptance steps
    // ------------------------------------------------------------------------

    /// Step 1: resolve or create the invitee's customer record.
    ///
    /// An existing customer gets the invite's names written in place. If that
    /// update is rejected the record is deleted and recreated.
    pub async fn upsert_customer_for_invite<C>(
        &self,
        conn: &C,
        invite: &employee_invite::Model,
    ) -> Result<customer::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let Some(existing) = self.find_customer_by_email(conn, &invite.email).await? else {
            let created = self
                .create_customer(conn, &invite.email, &invite.first_name, &invite.last_name)
                .await?;
            tracing::info!(customer_id = %created.id, "Created customer for invite");
            return Ok(created);
        };

        let customer_id = existing.id.clone();
        match self
            .update_customer_names(conn, existing.clone(), invite, self.clock.now())
            .await
        {
            Ok(updated) => Ok(updated),
            Err(e) => {
                tracing::warn!(
                    customer_id = %customer_id,
                    error = %e,
                    "Customer update rejected, deleting and recreating"
                );
                existing.delete(conn).await?;
                let created = self
                    .create_customer(conn, &invite.email, &invite.first_name, &invite.last_name)
                    .await?;
                tracing::info!(customer_id = %created.id, "Recreated customer for invite");
                Ok(created)
            }
        }
    }

    /// Name update in its own savepoint so a rejection leaves the outer transaction usable
    async fn update_customer_names<C>(
        &self,
        conn: &C,
        existing: customer::Model,
        invite: &employee_invite::Model,
        now: DateTime<Utc>,
    ) -> std::result::Result<customer::Model, DbErr>
    where
        C: TransactionTrait,
    {
        let savepoint = conn.begin().await?;
        let mut model: customer::ActiveModel = existing.into();
        model.first_name = Set(invite.first_name.clone());
        model.last_name = Set(invite.last_name.clone());
        model.email = Set(normalize_email(&invite.email));
        model.has_account = Set(true);
        model.updated_at = Set(now);

        match model.update(&savepoint).await {
            Ok(updated) => {
                savepoint.commit().await?;
                Ok(updated)
            }
            Err(e) => {
                savepoint.rollback().await?;
                Err(e)
            }
        }
    }

    /// Step 2: delete every `(email, emailpass)` credential and its parent auth identity.
    ///
    /// Returns the number of credentials removed.
    pub async fn revoke_credentials<C: ConnectionTrait>(&self, conn: &C, email: &str) -> Result<usize> {
        let existing = ProviderIdentity::find()
            .filter(provider_identity::Column::Provider.eq(EMAILPASS_PROVIDER))
            .filter(provider_identity::Column::EntityId.eq(normalize_email(email)))
            .all(conn)
            .await?;

        if existing.is_empty() {
            return Ok(0);
        }

        let identity_ids: Vec<String> = existing.iter().map(|p| p.id.clone()).collect();
        let mut auth_identity_ids: Vec<String> =
            existing.iter().map(|p| p.auth_identity_id.clone()).collect();
        auth_identity_ids.sort();
        auth_identity_ids.dedup();

        ProviderIdentity::delete_many()
            .filter(provider_identity::Column::Id.is_in(identity_ids.clone()))
            .exec(conn)
            .await?;
        AuthIdentity::delete_many()
            .filter(auth_identity::Column::Id.is_in(auth_identity_ids))
            .exec(conn)
            .await?;

        tracing::info!(count = identity_ids.len(), "Cleaned up existing credentials for invitee");
        Ok(identity_ids.len())
    }

    /// Steps 3–4: create an auth identity for the customer, then the email/password
    /// credential. A unique violation on `(provider, entity_id)` means another
    /// acceptance won the race; that is reported as [`CredentialOutcome::AlreadyExists`].
    pub async fn issue_credentials<C>(
        &self,
        conn: &C,
        customer: &customer::Model,
        password_hash: &str,
    ) -> Result<CredentialOutcome>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let now = self.clock.now();
        let savepoint = conn.begin().await?;

        let identity = auth_identity::ActiveModel {
            id: Set(generate_id("authid")),
            customer_id: Set(customer.id.clone()),
            role: Set(EMPLOYEE_ROLE.to_string()),
            created_at: Set(now),
        }
        .insert(&savepoint)
        .await?;

        let credential = provider_identity::ActiveModel {
            id: Set(generate_id("provid")),
            provider: Set(EMAILPASS_PROVIDER.to_string()),
            entity_id: Set(customer.email.clone()),
            auth_identity_id: Set(identity.id.clone()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
        };

        match credential.insert(&savepoint).await {
            Ok(_) => {
                savepoint.commit().await?;
                Ok(CredentialOutcome::Created {
                    auth_identity_id: identity.id,
                })
            }
            Err(e) if is_unique_violation(&e) => {
                // Drops the orphaned auth identity along with the failed insert
                savepoint.rollback().await?;
                tracing::info!(
                    customer_id = %customer.id,
                    "Credential already exists for this email, continuing"
                );
                Ok(CredentialOutcome::AlreadyExists)
            }
            Err(e) => {
                savepoint.rollback().await?;
                Err(e.into())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Login
    // ------------------------------------------------------------------------

    /// Verify an email/password login and return the customer it belongs to
    pub async fn authenticate_customer(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<customer::Model>> {
        let Some(credential) = ProviderIdentity::find()
            .filter(provider_identity::Column::Provider.eq(EMAILPASS_PROVIDER))
            .filter(provider_identity::Column::EntityId.eq(normalize_email(email)))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        if !self.verify(password, &credential.password_hash).await? {
            return Ok(None);
        }

        let Some(identity) = AuthIdentity::find_by_id(credential.auth_identity_id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        self.find_customer(&identity.customer_id).await
    }

    /// Verify a platform administrator login
    pub async fn authenticate_user(&self, email: &str, password: &str) -> Result<Option<user::Model>> {
        let Some(found) = User::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        if self.verify(password, &found.hashed_password).await? {
            Ok(Some(found))
        } else {
            Ok(None)
        }
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let hasher = self.hasher;
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }

    /// Create the platform administrator if no user with this email exists yet
    pub async fn ensure_admin_user(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<user::Model> {
        let email = normalize_email(email);
        if let Some(existing) = User::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await?
        {
            return Ok(existing);
        }

        let now = self.clock.now();
        let admin = user::ActiveModel {
            id: Set(generate_id("user")),
            email: Set(email),
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            hashed_password: Set(self.hash_password(password).await?),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(user_id = %admin.id, "Platform admin user created");
        Ok(admin)
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
