//! Configuration loading and path resolution
//!
//! Config file resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. `ORGCHART_CONFIG` environment variable
//! 3. `~/.config/orgchart/config.toml`
//! 4. Built-in defaults (no file)
//!
//! A missing file is not fatal: the service warns and starts on defaults.
//! Store credentials can always be overridden from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "ORGCHART_CONFIG";

const URL_ENV_VARS: &[&str] = &["SUPABASE_URL", "VITE_SUPABASE_URL"];
const KEY_ENV_VARS: &[&str] = &["SUPABASE_KEY", "VITE_SUPABASE_KEY"];

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgchartConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub fallback: FallbackConfig,
    pub root: RootConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Directory with the browser front-end, served at `/` when set
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5740".to_string(),
            static_dir: None,
        }
    }
}

/// Hosted record store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://<project>.supabase.co`
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub access_table: String,
    /// Upper bound for the initial bulk fetch only
    pub fetch_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: "tabela_organograma".to_string(),
            access_table: "organograma_acessos".to_string(),
            fetch_timeout_secs: 10,
        }
    }
}

impl StoreConfig {
    /// True when both URL and key are present
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

/// Local roster used when the store cannot be reached at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub roster_json: Option<PathBuf>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            roster_json: Some(PathBuf::from("output.json")),
        }
    }
}

/// Root view shaping
///
/// When `expected_directors` is non-empty the root view lists only those
/// directors (if any are present) and shows a single vacancy card when some
/// of them are missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    pub expected_directors: Vec<String>,
    pub vacancy_name: String,
    pub vacancy_title: String,
    pub vacancy_area: String,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            expected_directors: Vec::new(),
            vacancy_name: "VAGA EM ABERTO".to_string(),
            vacancy_title: "DIRETOR".to_string(),
            vacancy_area: String::new(),
        }
    }
}

/// Login gate for the JSON API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Pick the config file path by priority. `None` means run on defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: user config directory
    dirs::config_dir()
        .map(|d| d.join("orgchart").join("config.toml"))
        .filter(|p| p.exists())
}

impl OrgchartConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load from `path`, falling back to defaults when the file is absent
    ///
    /// A file that exists but does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let content = std::fs::read_to_string(p)?;
                let config = Self::from_toml_str(&content)?;
                info!("Loaded configuration from {}", p.display());
                config
            }
            Some(p) => {
                warn!("Config file not found at {}; using defaults", p.display());
                Self::default()
            }
            None => {
                info!("No config file; using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Store credentials from the environment win over file values
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = first_env(URL_ENV_VARS) {
            self.store.url = url;
        }
        if let Some(key) = first_env(KEY_ENV_VARS) {
            self.store.api_key = key;
        }
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|n| std::env::var(n).ok())
        .find(|v| !v.trim().is_empty())
}
