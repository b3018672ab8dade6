use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::core::dispatch::DispatchPolicy;

/// Environment variable naming the config file used when no path is given.
pub const CONFIG_ENV: &str = "TOPICBUS_CONFIG";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BusConfig {
    pub dispatch: DispatchPolicy,
    pub log_unknown_topics: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchPolicy::Abort,
            log_unknown_topics: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `topicbus=debug`.
    pub filter: String,
    pub thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            thread_ids: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bus: BusConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config parse error: {0}")]
    Parse(String),
}

/// Reads exactly one TOML file. Missing keys fall back to defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let raw: String = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&raw)?;
    Ok(config)
}

impl Config {
    /// Load configuration from an optional file path and environment variables.
    ///
    /// Precedence: built-in defaults, then the file (`path` or
    /// `TOPICBUS_CONFIG`), then `TOPICBUS_*` environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let env_path = env::var(CONFIG_ENV).ok();
        let effective_path = path.map(|s| s.to_string()).or(env_path);

        let mut config = match effective_path {
            Some(p) => load_config(p)?,
            None => Config::default(),
        };

        config.apply_env_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Applies `TOPICBUS_DISPATCH`, `TOPICBUS_LOG_UNKNOWN_TOPICS` and
    /// `TOPICBUS_LOG` using `lookup` as the environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TOPICBUS_DISPATCH") {
            self.bus.dispatch = v
                .parse()
                .map_err(|e| ConfigError::Parse(format!("TOPICBUS_DISPATCH: {e}")))?;
        }

        if let Some(v) = lookup("TOPICBUS_LOG_UNKNOWN_TOPICS") {
            self.bus.log_unknown_topics =
                matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }

        if let Some(v) = lookup("TOPICBUS_LOG") {
            self.logging.filter = v;
        }

        Ok(())
    }
}
