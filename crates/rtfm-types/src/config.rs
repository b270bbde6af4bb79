//! Configuration loading for rtfm.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/rtfm/config.toml.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::source::{default_sources, SourceConfig, SourceRegistry};

/// HTTP client settings used when fetching inventories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("rtfm/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum number of ranked matches returned per query
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// Source used when a lookup names none
    #[serde(default = "default_source_id")]
    pub default_source: String,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpSettings,

    /// Documentation sources, in display order
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_result_limit() -> usize {
    8
}

fn default_source_id() -> String {
    "discord.py".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            result_limit: default_result_limit(),
            default_source: default_source_id(),
            http: HttpSettings::default(),
            sources: default_sources(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/rtfm/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (RTFM_*, nested keys joined with `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from("", "", "rtfm")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("result_limit", default_result_limit() as i64)
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("default_source", default_source_id())
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("http.timeout_secs", default_timeout_secs() as i64)
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("http.user_agent", default_user_agent())
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // RTFM_LOG_LEVEL, RTFM_RESULT_LIMIT, RTFM_HTTP__TIMEOUT_SECS, ...
        builder = builder.add_source(
            Environment::with_prefix("RTFM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Validate the loaded values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.result_limit == 0 {
            return Err(ConfigError::Invalid(
                "result_limit must be > 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.id.trim().is_empty() {
                return Err(ConfigError::Invalid("source id must not be empty".to_string()));
            }
            if !(source.base_url.starts_with("http://") || source.base_url.starts_with("https://"))
            {
                return Err(ConfigError::Invalid(format!(
                    "source '{}' has a non-http base_url: {}",
                    source.id, source.base_url
                )));
            }
            for name in std::iter::once(&source.id).chain(source.aliases.iter()) {
                if !seen.insert(name.to_lowercase()) {
                    return Err(ConfigError::Invalid(format!(
                        "source name '{}' is used more than once",
                        name
                    )));
                }
            }
        }

        if !seen.contains(&self.default_source.to_lowercase()) {
            return Err(ConfigError::Invalid(format!(
                "default_source '{}' is not a configured source",
                self.default_source
            )));
        }

        Ok(())
    }

    /// Build the lookup table for the configured sources.
    pub fn registry(&self) -> SourceRegistry {
        SourceRegistry::new(self.sources.clone())
    }
}
