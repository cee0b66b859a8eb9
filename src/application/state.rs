use std::sync::Arc;

use crate::db::DbConn;
use crate::services::{
    AccountService, EmployeeService, InviteService, InviteSettings, JwtKeys, NotificationService,
    PasswordHasher, SharedClock,
};

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtKeys>,
    pub clock: SharedClock,
    pub accounts: AccountService,
    pub employees: EmployeeService,
    pub invites: InviteService,
}

impl AppState {
    /// Wire every service from its explicit dependencies
    pub fn new(
        db: DbConn,
        jwt: JwtKeys,
        hasher: PasswordHasher,
        notification: NotificationService,
        clock: SharedClock,
        settings: InviteSettings,
    ) -> Self {
        let accounts = AccountService::new(db.clone(), hasher, clock.clone());
        let employees = EmployeeService::new(db.clone(), clock.clone());
        let invites = InviteService::new(
            db,
            accounts.clone(),
            employees.clone(),
            notification,
            clock.clone(),
            settings,
        );

        Self {
            jwt: Arc::new(jwt),
            clock,
            accounts,
            employees,
            invites,
        }
    }
}
