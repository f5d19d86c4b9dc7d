//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `PEEK_STORE_BACKEND` is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. With no file anywhere, the built-in defaults are used
//!
//! ## Environment Variables
//! - `PEEK_STORE_BACKEND`: `memory` or `sqlite` (required for env loading)
//! - `PEEK_STORE_PATH`: SQLite database file
//! - `PEEK_STORE_POOL_SIZE`: Connection pool size
//! - `PEEK_STORE_CONNECTION_TIMEOUT_SECS`: Seconds to wait for a connection
//! - `PEEK_MEDIA_ROOT`: Directory uploaded images are written to
//! - `PEEK_MEDIA_BASE_URL`: Public URL the media root is served under
//! - `PEEK_LOG_LEVEL`: Default tracing filter
//! - `PEEK_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./peek.json` or `./peek.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use peek_domain::{Config, LoggingConfig, MediaConfig, PeekError, Result, StoreBackend, StoreConfig};

const CONFIG_FILE_NAMES: [&str; 4] = ["peek.json", "peek.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the backend
/// variable is missing, falls back to a probed config file, and finally to
/// [`Config::default`].
///
/// # Errors
/// Returns `PeekError::Config` if an environment value or the probed file is
/// invalid.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) if std::env::var_os("PEEK_STORE_BACKEND").is_some() => Err(e),
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::info!("No config file found, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }
}

/// Load configuration from environment variables
///
/// Only `PEEK_STORE_BACKEND` is required; every other setting falls back to
/// its default.
///
/// # Errors
/// Returns `PeekError::Config` if the backend variable is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let backend = env_var("PEEK_STORE_BACKEND")?
        .parse::<StoreBackend>()
        .map_err(PeekError::Config)?;

    let store_defaults = StoreConfig::default();
    let pool_size = match std::env::var("PEEK_STORE_POOL_SIZE") {
        Ok(s) => s
            .parse::<u32>()
            .map_err(|e| PeekError::Config(format!("Invalid pool size: {}", e)))?,
        Err(_) => store_defaults.pool_size,
    };
    let connection_timeout_secs = match std::env::var("PEEK_STORE_CONNECTION_TIMEOUT_SECS") {
        Ok(s) => s
            .parse::<u64>()
            .map_err(|e| PeekError::Config(format!("Invalid connection timeout: {}", e)))?,
        Err(_) => store_defaults.connection_timeout_secs,
    };

    let media_defaults = MediaConfig::default();
    let log_defaults = LoggingConfig::default();

    Ok(Config {
        store: StoreConfig {
            backend,
            path: std::env::var("PEEK_STORE_PATH").ok(),
            pool_size,
            connection_timeout_secs,
        },
        media: MediaConfig {
            root_dir: std::env::var("PEEK_MEDIA_ROOT").unwrap_or(media_defaults.root_dir),
            public_base_url: std::env::var("PEEK_MEDIA_BASE_URL")
                .unwrap_or(media_defaults.public_base_url),
        },
        logging: LoggingConfig {
            level: std::env::var("PEEK_LOG_LEVEL").unwrap_or(log_defaults.level),
            json: env_bool("PEEK_LOG_JSON", log_defaults.json),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PeekError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PeekError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PeekError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PeekError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PeekError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PeekError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(PeekError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its two nearest parents, and the
/// same three levels around the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| PeekError::Config(format!("Missing required environment variable: {}", key)))
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
