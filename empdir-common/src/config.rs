//! Configuration loading
//!
//! Every setting is resolved with the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or malformed TOML file never stops startup: a warning is logged
//! and the remaining sources are used.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const ENV_CONFIG: &str = "EMPDIR_CONFIG";
pub const ENV_DATABASE: &str = "EMPDIR_DATABASE";
pub const ENV_LISTEN_ADDR: &str = "EMPDIR_LISTEN_ADDR";
pub const ENV_PORT: &str = "EMPDIR_PORT";
pub const ENV_LOG_LEVEL: &str = "EMPDIR_LOG_LEVEL";
pub const ENV_SECRET_KEY: &str = "EMPDIR_SECRET_KEY";

/// Settings as written in `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub database_path: Option<PathBuf>,
    pub listen_addr: Option<IpAddr>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub secret_key: Option<String>,
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Values given on the command line (highest priority)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub listen_addr: Option<IpAddr>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub listen_addr: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Secret for signing cookies; `None` means a random per-process key
    /// (environment or TOML only, never a command-line argument)
    pub secret_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            listen_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            log_level: "info".to_string(),
            secret_key: None,
        }
    }
}

impl Config {
    /// Resolve configuration from overrides, environment, TOML file and defaults
    ///
    /// Problems with individual sources are logged as warnings.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        let (config, warnings) = Self::resolve_with_warnings(overrides);
        for warning in &warnings {
            warn!("{}", warning);
        }
        config
    }

    /// Same as [`Config::resolve`], returning the warnings instead of logging them
    ///
    /// For callers that can only install a log subscriber once the resolved
    /// log level is known.
    pub fn resolve_with_warnings(overrides: ConfigOverrides) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let toml = config_file_path(overrides.config_file.as_deref())
            .and_then(|path| match TomlConfig::load(&path) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    warnings.push(format!("Ignoring config file {}: {}", path.display(), e));
                    None
                }
            })
            .unwrap_or_default();

        let defaults = Config::default();

        let config = Config {
            database_path: overrides
                .database_path
                .or_else(|| std::env::var(ENV_DATABASE).ok().map(PathBuf::from))
                .or(toml.database_path)
                .unwrap_or(defaults.database_path),
            listen_addr: overrides
                .listen_addr
                .or_else(|| env_parsed(ENV_LISTEN_ADDR, &mut warnings))
                .or(toml.listen_addr)
                .unwrap_or(defaults.listen_addr),
            port: overrides
                .port
                .or_else(|| env_parsed(ENV_PORT, &mut warnings))
                .or(toml.port)
                .unwrap_or(defaults.port),
            log_level: overrides
                .log_level
                .or_else(|| std::env::var(ENV_LOG_LEVEL).ok())
                .or(toml.log_level)
                .unwrap_or(defaults.log_level),
            secret_key: std::env::var(ENV_SECRET_KEY)
                .ok()
                .filter(|k| !k.is_empty())
                .or(toml.secret_key.filter(|k| !k.is_empty())),
        };

        (config, warnings)
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str, warnings: &mut Vec<String>) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warnings.push(format!("Ignoring unparsable {}={}", name, raw));
            None
        }
    }
}

/// Locate the TOML file: explicit path, then env var, then the user config dir
///
/// The user config file is only returned if it exists; an explicitly named
/// file is always returned so that a typo is reported.
fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(ENV_CONFIG) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|d| d.join("empdir").join("config.toml"))
        .filter(|p| p.exists())
}

/// `<local data dir>/empdir/app.db`, or `./app.db` when no data dir exists
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("empdir").join("app.db"))
        .unwrap_or_else(|| PathBuf::from("app.db"))
}
