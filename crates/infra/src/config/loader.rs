//! Configuration loader
//!
//! Loads exporter configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `TILLSTAT_CONFIG` names a file, load that file
//! 2. Otherwise, if the required credentials are set in the environment, load
//!    everything from environment variables
//! 3. Otherwise, probe the standard paths for a config file
//! 4. Supports JSON and TOML formats
//!
//! The result is always validated before it is returned.
//!
//! ## Environment Variables
//! - `SQUARE_ACCESS_TOKEN`: Square access token (required)
//! - `SQUARE_LOCATION_ID`: Square location id (required)
//! - `SQUARE_API_BASE`: API base URL
//! - `SQUARE_API_VERSION`: value of the `Square-Version` header
//! - `SQUARE_DEFAULT_CURRENCY`: currency used when none can be detected
//! - `SQUARE_REQUEST_TIMEOUT_SECS`: per-request timeout in seconds
//! - `EXPORTER_PORT`: listening port
//! - `EXPORTER_BIND_ADDRESS`: listening address
//! - `SCRAPE_WINDOW_H`: look-back window in hours
//! - `EXPORTER_ON_FETCH_ERROR`: `serve_stale` or `fail`
//! - `TILLSTAT_LOG_FORMAT`: `pretty` or `json`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./tillstat.toml`, `./tillstat.json`, `./config.toml`, `./config.json`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tillstat_domain::{
    Config, FetchErrorPolicy, LogFormat, LoggingConfig, Result, ScrapeConfig, ServerConfig,
    SquareConfig, TillstatError,
};

pub const ENV_ACCESS_TOKEN: &str = "SQUARE_ACCESS_TOKEN";
pub const ENV_LOCATION_ID: &str = "SQUARE_LOCATION_ID";
pub const ENV_CONFIG_PATH: &str = "TILLSTAT_CONFIG";

const CONFIG_FILE_NAMES: [&str; 4] = ["tillstat.toml", "tillstat.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `TillstatError::Config` if:
/// - Configuration cannot be loaded from any source
/// - A value is present but malformed
/// - The loaded configuration fails validation
pub fn load() -> Result<Config> {
    let config = if let Some(path) = env_opt(ENV_CONFIG_PATH) {
        load_from_file(Some(PathBuf::from(path)))?
    } else if credentials_in_env() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        config
    } else {
        tracing::debug!("Square credentials not in environment, trying config file");
        load_from_file(None).map_err(|err| {
            TillstatError::Config(format!(
                "{ENV_ACCESS_TOKEN} and {ENV_LOCATION_ID} must be set ({err})"
            ))
        })?
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// The access token and location id are required; every other variable falls
/// back to its default when unset.
///
/// # Errors
/// Returns `TillstatError::Config` if required variables are missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let defaults = SquareConfig::new("", "");
    let square = SquareConfig {
        access_token: env_var(ENV_ACCESS_TOKEN)?,
        location_id: env_var(ENV_LOCATION_ID)?,
        base_url: env_opt("SQUARE_API_BASE").unwrap_or(defaults.base_url),
        api_version: env_opt("SQUARE_API_VERSION").unwrap_or(defaults.api_version),
        default_currency: env_opt("SQUARE_DEFAULT_CURRENCY"),
        request_timeout_secs: env_parse("SQUARE_REQUEST_TIMEOUT_SECS")?
            .unwrap_or(defaults.request_timeout_secs),
    };

    let server_defaults = ServerConfig::default();
    let server = ServerConfig {
        port: env_parse("EXPORTER_PORT")?.unwrap_or(server_defaults.port),
        bind_address: env_opt("EXPORTER_BIND_ADDRESS").unwrap_or(server_defaults.bind_address),
    };

    let scrape_defaults = ScrapeConfig::default();
    let scrape = ScrapeConfig {
        window_hours: env_parse("SCRAPE_WINDOW_H")?.unwrap_or(scrape_defaults.window_hours),
        on_fetch_error: env_enum::<FetchErrorPolicy>("EXPORTER_ON_FETCH_ERROR")?
            .unwrap_or(scrape_defaults.on_fetch_error),
    };

    let logging = LoggingConfig {
        format: env_enum::<LogFormat>("TILLSTAT_LOG_FORMAT")?.unwrap_or_default(),
    };

    Ok(Config { square, server, scrape, logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TillstatError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TillstatError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TillstatError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TillstatError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TillstatError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TillstatError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(TillstatError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn credentials_in_env() -> bool {
    env_opt(ENV_ACCESS_TOKEN).is_some() && env_opt(ENV_LOCATION_ID).is_some()
}

/// Get required environment variable
///
/// # Errors
/// Returns `TillstatError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        TillstatError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Get optional environment variable, treating blank values as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse an optional numeric environment variable
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| TillstatError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}

/// Parse an optional enum environment variable
fn env_enum<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    env_opt(key)
        .map(|raw| raw.parse::<T>().map_err(|e| TillstatError::Config(format!("{}: {}", key, e))))
        .transpose()
}
