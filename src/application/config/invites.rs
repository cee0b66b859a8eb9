use std::env;

use super::env_parse;

#[derive(Debug, Clone)]
pub struct InvitesConfig {
    /// Base URL of the storefront; invite links are `{storefront_url}/invite/{token}`
    pub storefront_url: String,
    pub ttl_days: i64,
    pub expiry_sweep_secs: u64,
}

impl InvitesConfig {
    pub fn from_env() -> Self {
        Self {
            storefront_url: env::var("INVITES_STOREFRONT_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            ttl_days: env_parse("INVITES_TTL_DAYS", 7),
            // tokio intervals panic on zero
            expiry_sweep_secs: env_parse("INVITES_EXPIRY_SWEEP_SECS", 3600u64).max(1),
        }
    }
}
