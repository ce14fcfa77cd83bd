//! Configuration loading and resolution
//!
//! Each setting is resolved independently in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ENV_API_HOST: &str = "API_HOST";
pub const ENV_API_PORT: &str = "API_PORT";
pub const ENV_DEBUG_MODE: &str = "DEBUG_MODE";
pub const ENV_GEOCODER_URL: &str = "GEOCODER_URL";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DEBUG: bool = true;
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Optional settings read from `config.toml`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: Option<bool>,
    pub geocoder_url: Option<String>,
}

impl TomlConfig {
    /// Load and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load an explicit config file, or the platform default if it exists
    ///
    /// An explicit path must exist. A missing default file is not an error.
    pub fn load_optional(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config file {}", path.display());
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                info!("Loading config file {}", path.display());
                Self::load(&path)
            }
            _ => {
                debug!("No config file found, using environment and defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: Option<bool>,
    pub geocoder_url: Option<String>,
    pub config_file: Option<PathBuf>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub geocoder_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            debug: DEFAULT_DEBUG,
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Resolve configuration from CLI, environment, config file and defaults
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let toml_config = TomlConfig::load_optional(overrides.config_file.as_deref())?;
        Self::resolve_with(overrides, &toml_config)
    }

    /// Resolve against an already-loaded TOML config
    pub fn resolve_with(overrides: &ConfigOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let env_port = match env_value(ENV_API_PORT) {
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| {
                Error::Config(format!("{} must be a port number, got '{}'", ENV_API_PORT, raw))
            })?),
            None => None,
        };

        let host = overrides
            .host
            .clone()
            .or_else(|| env_value(ENV_API_HOST))
            .or_else(|| toml_config.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = overrides
            .port
            .or(env_port)
            .or(toml_config.port)
            .unwrap_or(DEFAULT_PORT);

        let debug = overrides
            .debug
            .or_else(|| env_value(ENV_DEBUG_MODE).map(|v| parse_debug_flag(&v)))
            .or(toml_config.debug)
            .unwrap_or(DEFAULT_DEBUG);

        let geocoder_url = overrides
            .geocoder_url
            .clone()
            .or_else(|| env_value(ENV_GEOCODER_URL))
            .or_else(|| toml_config.geocoder_url.clone())
            .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string());

        Ok(Self {
            host,
            port,
            debug,
            geocoder_url: geocoder_url.trim_end_matches('/').to_string(),
        })
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `DEBUG_MODE` is on only for the literal `true`, in any case
pub fn parse_debug_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Platform config path: `<config_dir>/community-map/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("community-map").join("config.toml"))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
