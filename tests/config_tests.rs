//! Tests for configuration loading

use employee_invites::config::invites::InvitesConfig;
use employee_invites::config::Config;

#[test]
fn test_config_defaults() {
    let config = Config::from_env();

    assert_eq!(config.invites.ttl_days, 7);
    assert!(config.database.database_url.contains("://"));
    assert!(!config.version.is_empty());
}

#[test]
fn test_zero_sweep_interval_is_raised_to_one_second() {
    std::env::set_var("INVITES_EXPIRY_SWEEP_SECS", "0");
    let config = InvitesConfig::from_env();
    std::env::remove_var("INVITES_EXPIRY_SWEEP_SECS");

    assert_eq!(config.expiry_sweep_secs, 1);
}
