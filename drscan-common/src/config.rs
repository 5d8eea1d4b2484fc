//! Configuration loading and inference endpoint resolution
//!
//! Base URL priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`DRSCAN_API_URL`)
//! 3. TOML config file (`api_url`)
//! 4. Compiled default (fallback)
//!
//! Missing config files are not an error. The workspace never writes config.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Hosted inference server used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://harishvijayasarangan-dr-server.hf.space";

/// Environment variable overriding the inference base URL
pub const API_URL_ENV: &str = "DRSCAN_API_URL";

/// Configuration file loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Inference service base URL (optional)
    #[serde(default)]
    pub api_url: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
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

fn default_log_level() -> String {
    "info".to_string()
}

/// Where the resolved base URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    CommandLine,
    Environment,
    TomlFile,
    CompiledDefault,
}

impl std::fmt::Display for UrlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UrlSource::CommandLine => "command line",
            UrlSource::Environment => "environment",
            UrlSource::TomlFile => "TOML config",
            UrlSource::CompiledDefault => "compiled default",
        };
        f.write_str(name)
    }
}

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Inference base URL without trailing slash
    pub api_url: String,
    pub api_url_source: UrlSource,
    pub log_level: String,
}

impl ClientConfig {
    /// Resolve the client configuration from the CLI flag, environment and TOML file
    pub fn resolve(cli_api_url: Option<&str>, toml_config: &TomlConfig) -> Self {
        let (api_url, api_url_source) = resolve_api_url(cli_api_url, toml_config);
        info!(api_url = %api_url, source = %api_url_source, "Inference endpoint resolved");

        Self {
            api_url,
            api_url_source,
            log_level: toml_config.logging.level.clone(),
        }
    }
}

/// Resolve the inference base URL following the priority order above
pub fn resolve_api_url(cli_arg: Option<&str>, toml_config: &TomlConfig) -> (String, UrlSource) {
    // Priority 1: Command-line argument
    if let Some(url) = cli_arg.filter(|u| is_usable(u)) {
        return (normalize_base_url(url), UrlSource::CommandLine);
    }

    // Priority 2: Environment variable
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if is_usable(&url) {
            return (normalize_base_url(&url), UrlSource::Environment);
        }
    }

    // Priority 3: TOML config file
    if let Some(url) = toml_config.api_url.as_deref().filter(|u| is_usable(u)) {
        return (normalize_base_url(url), UrlSource::TomlFile);
    }

    // Priority 4: Compiled default
    (DEFAULT_API_URL.to_string(), UrlSource::CompiledDefault)
}

fn is_usable(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Trim whitespace and trailing slashes so routes can be appended with `/`
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Default configuration file path for the platform
///
/// `~/.config/drscan/config.toml` on Linux, the platform config dir elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("drscan").join("config.toml"))
}

/// Load a TOML config file
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    Ok(Some(config))
}

/// Startup configuration plus any problem to report once logging is up
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub toml: TomlConfig,
    pub warning: Option<String>,
}

/// Load the `--config` file if given, else the default path
///
/// Never fails. Unreadable or invalid files and a missing explicit file fall
/// back to defaults with a warning. A missing default file is silent.
pub fn load_startup_config(explicit: Option<&Path>) -> StartupConfig {
    let path = match explicit.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => return StartupConfig::default(),
    };

    match load_toml_config(&path) {
        Ok(Some(toml)) => StartupConfig { toml, warning: None },
        Ok(None) if explicit.is_some() => StartupConfig {
            toml: TomlConfig::default(),
            warning: Some(format!("Config file not found: {}", path.display())),
        },
        Ok(None) => StartupConfig::default(),
        Err(e) => StartupConfig {
            toml: TomlConfig::default(),
            warning: Some(e.to_string()),
        },
    }
}
