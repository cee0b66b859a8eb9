pub mod auth;
pub mod security_headers;

pub use auth::require_auth;
pub use auth::AuthenticatedActor;
pub use security_headers::security_headers;
