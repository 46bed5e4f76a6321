//! Layered configuration loading

use std::fs;
use std::path::PathBuf;
use tw_api::config::load_config_from;
use tw_shared::{Environment, LogFormat};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tokenward-{}-{}", name, std::process::id()));
    fs::create_dir_all(dir.join("config")).unwrap();
    dir
}

#[test]
fn test_defaults_without_file() {
    let dir = scratch_dir("defaults");

    let config = load_config_from(Environment::Production, &dir).unwrap();

    assert_eq!(config.environment, Environment::Production);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.auth.jwt.expiry_seconds, 7200);
    assert_eq!(config.auth.jwt.algorithm, "HS256");
    assert!(config.cache.enabled);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_file_overrides_defaults() {
    let dir = scratch_dir("file");
    fs::write(
        dir.join("config/staging.toml"),
        r#"
[server]
host = "0.0.0.0"
port = 9100

[auth]
store_timeout_ms = 250

[auth.jwt]
issuer = "svc"
secret = "from-file"
expiry_seconds = 600

[cache]
enabled = false
key_prefix = "rv:"
"#,
    )
    .unwrap();

    let config = load_config_from(Environment::Staging, &dir).unwrap();

    assert_eq!(config.server.bind_address(), "0.0.0.0:9100");
    assert_eq!(config.auth.store_timeout_ms, 250);
    assert_eq!(config.auth.jwt.issuer, "svc");
    assert_eq!(config.auth.jwt.secret, "from-file");
    assert_eq!(config.auth.jwt.expiry_seconds, 600);
    assert!(!config.cache.enabled);
    assert_eq!(config.cache.key_prefix, "rv:");
    // Untouched sections keep their defaults
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.cache.url, "redis://localhost:6379");

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_invalid_file_is_an_error() {
    let dir = scratch_dir("invalid");
    fs::write(dir.join("config/development.toml"), "[server]\nport = \"not a port\"\n").unwrap();

    assert!(load_config_from(Environment::Development, &dir).is_err());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_plain_env_vars_seed_defaults() {
    let dir = scratch_dir("plain-env");
    std::env::set_var("JWT_SECRET", "prod-secret");

    let config = load_config_from(Environment::Production, &dir);
    std::env::remove_var("JWT_SECRET");
    let config = config.unwrap();

    assert_eq!(config.auth.jwt.secret, "prod-secret");
    assert!(!config.auth.jwt.is_using_default_secret());
    assert_eq!(config.environment, Environment::Production);
    assert_eq!(config.logging.level, "warn");

    fs::remove_dir_all(dir).ok();
}
