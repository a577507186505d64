//! Configuration types.
//!
//! Configuration is optional. Without a file the widget uses the reference
//! timings: the submission resolves after 1000ms and times out after 2000ms.
//!
//! ```toml
//! [submission]
//! delay_ms = 1000
//! timeout_ms = 2000
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FEEDBACK_CONFIG";

/// Runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Submission race timings
    #[serde(default)]
    pub submission: SubmissionConfig,
}

/// Timings for the submission race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// How long the simulated submission call takes.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// How long to wait before giving up on the submission.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_timeout_ms() -> u64 {
    2000
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SubmissionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl FlowConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: FlowConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Load from `$FEEDBACK_CONFIG` or the default location.
    ///
    /// A file named by `$FEEDBACK_CONFIG` must exist and parse. Only the
    /// default location may be absent, in which case this returns Ok(None).
    pub fn load_from_default_location() -> Result<Option<Self>, ConfigError> {
        Self::load_from_paths(explicit_config_path(), default_config_path())
    }

    fn load_from_paths(
        explicit: Option<PathBuf>,
        default: Option<PathBuf>,
    ) -> Result<Option<Self>, ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load(&path)?;
            tracing::info!("Config loaded from {}", path.display());
            return Ok(Some(config));
        }

        let path = default.ok_or(ConfigError::NoConfigDir)?;
        if !path.exists() {
            tracing::info!("No config at {} - using defaults", path.display());
            return Ok(None);
        }

        let config = Self::load(&path)?;
        tracing::info!("Config loaded from {}", path.display());
        Ok(Some(config))
    }

    /// Like [`load_from_default_location`](Self::load_from_default_location),
    /// but degrades to defaults instead of failing.
    pub fn load_or_default() -> Self {
        match Self::load_from_default_location() {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("{} - continuing with default configuration", e);
                Self::default()
            }
        }
    }

    /// Reject timings the race cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.submission.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "submission.timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("feedback"))
}

/// Get the path to the config file.
///
/// `$FEEDBACK_CONFIG` wins over the platform config directory.
pub fn config_path() -> Option<PathBuf> {
    explicit_config_path().or_else(default_config_path)
}

fn explicit_config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)
}

fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}
