//! Bootstrap configuration for artist-relay
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (`--port`, `--catalog-url`, ...)
//! 2. Environment variables (`PORT`, `RELAY_*`), surfaced through the CLI parser
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! Levels 1 and 2 arrive here as [`ConfigOverrides`]; this module owns the
//! TOML file and the defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Catalog API base URL
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.spotify.com/v1";

/// Market (country) used to scope top-tracks lookups
pub const DEFAULT_MARKET: &str = "US";

/// User-Agent sent to the catalog API
pub const DEFAULT_USER_AGENT: &str = concat!("artist-relay/", env!("CARGO_PKG_VERSION"));

/// Directory served for non-API paths
pub const DEFAULT_PUBLIC_DIR: &str = "public";

const CONFIG_DIR_NAME: &str = "artist-relay";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Bootstrap configuration loaded from TOML file
///
/// Every field has a built-in default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Static front-end directory
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Upstream catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            public_dir: default_public_dir(),
            catalog: CatalogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Upstream catalog API settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Country code passed as `country` to the top-tracks endpoint
    pub market: String,

    /// Request timeout in seconds; `None` keeps the transport default
    pub timeout_secs: Option<u64>,

    /// User-Agent header value
    pub user_agent: String,

    /// Bearer token forwarded to the catalog, if the catalog requires one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            market: DEFAULT_MARKET.to_string(),
            timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            bearer_token: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_public_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PUBLIC_DIR)
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line or through environment variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub public_dir: Option<PathBuf>,
    pub catalog_base_url: Option<String>,
    pub market: Option<String>,
    pub bearer_token: Option<String>,
    pub log_level: Option<String>,
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this TOML file
    File(PathBuf),
    /// No file was found; built-in defaults were used
    Defaults,
}

impl TomlConfig {
    /// Apply CLI/environment overrides on top of this configuration
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(public_dir) = overrides.public_dir {
            self.public_dir = public_dir;
        }
        if let Some(base_url) = overrides.catalog_base_url {
            self.catalog.base_url = base_url;
        }
        if let Some(market) = overrides.market {
            self.catalog.market = market;
        }
        if let Some(token) = overrides.bearer_token {
            self.catalog.bearer_token = Some(token);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        self
    }

    /// Reject values the relay cannot start with
    pub fn validate(&self) -> Result<()> {
        let base_url = self.catalog.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::InvalidInput(format!(
                "catalog base_url must be an http(s) URL, got {:?}",
                self.catalog.base_url
            )));
        }

        let market = &self.catalog.market;
        if market.len() != 2 || !market.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Error::InvalidInput(format!(
                "catalog market must be a two-letter uppercase country code, got {:?}",
                market
            )));
        }

        if self.catalog.timeout_secs == Some(0) {
            return Err(Error::InvalidInput(
                "catalog timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse a TOML configuration file
///
/// A file that cannot be read is [`Error::Io`]; one that does not parse is
/// [`Error::Config`].
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))
}

/// Default per-user config file location (`~/.config/artist-relay/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the bootstrap configuration
///
/// An explicitly requested file must exist and parse. Without one, the
/// per-user default location is tried, and a missing file there falls back
/// to built-in defaults. A file that exists but does not parse is always
/// an error.
pub fn load_config(explicit_path: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    if let Some(path) = explicit_path {
        let config = load_toml_config(path)?;
        return Ok((config, ConfigSource::File(path.to_path_buf())));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        _ => Ok((TomlConfig::default(), ConfigSource::Defaults)),
    }
}

/// Full resolution: TOML/defaults, then overrides, then validation
pub fn resolve_config(
    explicit_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<(TomlConfig, ConfigSource)> {
    let (config, source) = load_config(explicit_path)?;
    let config = config.with_overrides(overrides);
    config.validate()?;
    Ok((config, source))
}
