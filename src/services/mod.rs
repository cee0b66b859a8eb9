pub mod accounts;
pub mod clock;
pub mod employees;
pub mod invites;
pub mod notification;
pub mod saga;
pub mod scheduler;
pub mod security;

pub use accounts::{AccountService, Actor};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use employees::EmployeeService;
pub use invites::{InviteService, InviteSettings};
pub use notification::NotificationService;
pub use security::*;
