pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_companies;
mod m20260301_000002_create_customers;
mod m20260301_000003_create_employees;
mod m20260301_000004_create_employee_invites;
mod m20260301_000005_create_auth_identities;
mod m20260301_000006_create_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_companies::Migration),
            Box::new(m20260301_000002_create_customers::Migration),
            Box::new(m20260301_000003_create_employees::Migration),
            Box::new(m20260301_000004_create_employee_invites::Migration),
            Box::new(m20260301_000005_create_auth_identities::Migration),
            Box::new(m20260301_000006_create_users::Migration),
        ]
    }
}
