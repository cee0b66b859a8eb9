pub mod auth;
pub mod database;
pub mod email;
pub mod invites;
pub mod server;

use once_cell::sync::Lazy;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: server::ServerConfig,
    pub database: database::DatabaseConfig,
    pub auth: auth::AuthConfig,
    pub email: email::EmailConfig,
    pub invites: invites::InvitesConfig,

    pub version: String,

    // Logging
    pub log_level: String,
    /// "json" for structured output, anything else for plain text
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: server::ServerConfig::from_env(),
            database: database::DatabaseConfig::from_env(),
            auth: auth::AuthConfig::from_env(),
            email: email::EmailConfig::from_env(),
            invites: invites::InvitesConfig::from_env(),

            version: env!("CARGO_PKG_VERSION").to_string(),

            log_level: env::var("INVITES_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("INVITES_LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

/// Parse a boolean flag the way every section does ("true"/"1", case-insensitive)
pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1"))
        .unwrap_or(default)
}

/// Parse a numeric variable, falling back to `default` when unset or malformed
pub(crate) fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
