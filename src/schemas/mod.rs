pub mod auth;
pub mod employee;
pub mod invite;

pub use auth::*;
pub use employee::*;
pub use invite::*;
