pub mod auth_identity;
pub mod company;
pub mod customer;
pub mod employee;
pub mod employee_invite;
pub mod provider_identity;
pub mod user;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::auth_identity::{self, Entity as AuthIdentity};
    pub use super::company::{self, Entity as Company};
    pub use super::customer::{self, Entity as Customer};
    pub use super::employee::{self, Entity as Employee};
    pub use super::employee_invite::{self, Entity as EmployeeInvite, InviteStatus};
    pub use super::provider_identity::{self, Entity as ProviderIdentity};
    pub use super::user::{self, Entity as User};
}

/// Generate a prefixed opaque identifier, e.g. `inv_3f2a…`
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}
