//! Configuration management.
//!
//! Settings come from an optional TOML file layered under environment
//! variables prefixed with `ARXIV_SEARCH__`, using `__` between section and key:
//!
//! ```toml
//! [arxiv]
//! api_url = "http://export.arxiv.org/api/query"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! max_results = 1000
//! sort_by = "submittedDate"
//! sort_order = "descending"
//!
//! [display]
//! results = 10
//!
//! [logging]
//! level = "info"
//! ```
//!
//! The equivalent environment override for the timeout is
//! `ARXIV_SEARCH__ARXIV__TIMEOUT_SECS=60`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{SortBy, SortOrder, DEFAULT_MAX_RESULTS};
use crate::sources::ARXIV_API_URL;
use crate::utils::DEFAULT_USER_AGENT;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ARXIV_SEARCH";

/// Config file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "arxiv-search.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// arXiv API client settings
    #[serde(default)]
    pub arxiv: ArxivConfig,

    /// Result display settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// arXiv API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivConfig {
    /// Query endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Whole-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Entries requested per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
            max_results: default_max_results(),
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

fn default_api_url() -> String {
    ARXIV_API_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of papers shown per search (1-100)
    #[serde(default = "default_display_results")]
    pub results: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            results: default_display_results(),
        }
    }
}

fn default_display_results() -> usize {
    10
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
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

fn default_log_level() -> String {
    "info".to_string()
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?;

    settings.try_deserialize()
}

/// Load configuration from environment variables and defaults only
pub fn get_config() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder().add_source(env_source()).build()?;

    settings.try_deserialize()
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("arxiv-search").join("config.toml"))
        .filter(|path| path.is_file())
}
