use std::env;

use super::{env_flag, env_parse};

#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP delivery is disabled (log-only) when no host is configured
    pub smtp: Option<SmtpConfig>,
    pub from_address: String,
    pub from_name: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

impl EmailConfig {
    pub fn from_env() -> Self {
        let smtp = env::var("INVITES_SMTP_HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .map(|host| SmtpConfig {
                host,
                port: env_parse("INVITES_SMTP_PORT", 587),
                username: env::var("INVITES_SMTP_USERNAME").ok(),
                password: env::var("INVITES_SMTP_PASSWORD").ok(),
                use_tls: env_flag("INVITES_SMTP_TLS", true),
            });

        Self {
            smtp,
            from_address: env::var("INVITES_EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@localhost".to_string()),
            from_name: env::var("INVITES_EMAIL_FROM_NAME")
                .unwrap_or_else(|_| "B2B Store".to_string()),
        }
    }
}
