//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and the
//! environment.

use std::sync::Mutex;

use once_cell::sync::Lazy;
use tempfile::TempDir;
use tillstat_domain::{FetchErrorPolicy, LogFormat, TillstatError};
use tillstat_infra::config;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const ENV_KEYS: [&str; 6] = [
    "SQUARE_ACCESS_TOKEN",
    "SQUARE_LOCATION_ID",
    "EXPORTER_PORT",
    "SCRAPE_WINDOW_H",
    "EXPORTER_ON_FETCH_ERROR",
    "TILLSTAT_CONFIG",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("tillstat.toml");
    std::fs::write(
        &path,
        r#"
[square]
access_token = "sq0atp-file"
location_id = "L8QWZ"
base_url = "https://connect.squareupsandbox.com"
default_currency = "CAD"
request_timeout_secs = 10

[server]
port = 9464
bind_address = "127.0.0.1"

[scrape]
window_hours = 72
on_fetch_error = "fail"

[logging]
format = "json"
"#,
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("Failed to load TOML config");

    assert_eq!(config.square.access_token, "sq0atp-file");
    assert_eq!(config.square.location_id, "L8QWZ");
    assert_eq!(config.square.base_url, "https://connect.squareupsandbox.com");
    assert_eq!(config.square.api_version, "2023-07-20");
    assert_eq!(config.square.default_currency.as_deref(), Some("CAD"));
    assert_eq!(config.square.request_timeout_secs, 10);
    assert_eq!(config.server.port, 9464);
    assert_eq!(config.server.bind_address, "127.0.0.1");
    assert_eq!(config.scrape.window_hours, 72);
    assert_eq!(config.scrape.on_fetch_error, FetchErrorPolicy::Fail);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_config_from_json_file_uses_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "square": { "access_token": "t", "location_id": "L1" } }"#)
        .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("Failed to load JSON config");

    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.bind_address, "0.0.0.0");
    assert_eq!(config.scrape.window_hours, 24);
    assert_eq!(config.scrape.on_fetch_error, FetchErrorPolicy::ServeStale);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_invalid_toml_is_reported() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("tillstat.toml");
    std::fs::write(&path, "[square\naccess_token = ").expect("Failed to write config");

    let err = config::load_from_file(Some(path)).unwrap_err();
    assert!(matches!(err, TillstatError::Config(ref msg) if msg.contains("TOML")));
}

#[test]
fn test_environment_takes_precedence_over_files() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    clear_env();

    std::env::set_var("SQUARE_ACCESS_TOKEN", "env-token");
    std::env::set_var("SQUARE_LOCATION_ID", "ENVLOC");
    std::env::set_var("EXPORTER_PORT", "9100");

    let config = config::load().expect("config from env");
    assert_eq!(config.square.access_token, "env-token");
    assert_eq!(config.square.location_id, "ENVLOC");
    assert_eq!(config.server.port, 9100);

    clear_env();
}

#[test]
fn test_explicit_config_file_is_validated() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    clear_env();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("tillstat.toml");
    std::fs::write(
        &path,
        r#"
[square]
access_token = ""
location_id = "L1"
"#,
    )
    .expect("Failed to write config");
    std::env::set_var("TILLSTAT_CONFIG", &path);

    let err = config::load().unwrap_err();
    assert!(matches!(err, TillstatError::Config(ref msg) if msg.contains("access token")));

    clear_env();
}
