use std::env;

use super::env_parse;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret; a random per-process secret is used when unset
    pub jwt_secret: Option<String>,
    pub access_token_ttl_secs: i64,
    /// bcrypt cost shared by every stored credential
    pub password_hash_cost: u32,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Platform administrator seeded at startup
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let bootstrap_admin = match (
            env::var("INVITES_ADMIN_EMAIL"),
            env::var("INVITES_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Self {
            jwt_secret: env::var("INVITES_JWT_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            access_token_ttl_secs: env_parse("INVITES_ACCESS_TOKEN_TTL_SECS", 3600),
            password_hash_cost: env_parse("INVITES_PASSWORD_HASH_COST", bcrypt::DEFAULT_COST),
            bootstrap_admin,
        }
    }
}
