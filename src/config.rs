use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::openvsx::lookup::DEFAULT_BASE_URL;

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for registry requests in milliseconds (30 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// =============================================================================
// Naming constants
// =============================================================================

/// User agent sent to the registry
pub const DEFAULT_USER_AGENT: &str = "ovsx-badge";

/// Environment variable that overrides the configured log filter
pub const LOG_ENV_VAR: &str = "OVSX_BADGE_LOG";

const APP_DIR: &str = "ovsx-badge";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Application configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub registry: RegistryConfig,
    pub log: LogConfig,
}

/// Registry endpoint configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. "info" or "ovsx_badge=debug"
    pub level: String,
    /// Also write JSON logs to [`log_path`]
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
        }
    }
}

impl AppConfig {
    /// Loads the config at `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::read(path, true)
    }

    /// Loads a config file the user named explicitly; a missing file is an error
    pub fn load_required(path: &Path) -> Result<Self, ConfigError> {
        Self::read(path, false)
    }

    fn read(path: &Path, missing_is_default: bool) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if missing_is_default && e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the config file.
/// Uses $XDG_CONFIG_HOME/ovsx-badge/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/ovsx-badge/config.json,
/// or ./ovsx-badge/config.json if neither is available.
pub fn config_path() -> PathBuf {
    app_dir_with_env(
        std::env::var("XDG_CONFIG_HOME").ok(),
        dirs::home_dir(),
        ".config",
    )
    .join("config.json")
}

/// Returns the path to the data directory for ovsx-badge.
/// Uses $XDG_DATA_HOME/ovsx-badge if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/ovsx-badge,
/// or ./ovsx-badge if neither is available.
pub fn data_dir() -> PathBuf {
    app_dir_with_env(
        std::env::var("XDG_DATA_HOME").ok(),
        dirs::home_dir(),
        ".local/share",
    )
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("ovsx-badge.log")
}

fn app_dir_with_env(
    xdg_dir: Option<String>,
    home_dir: Option<PathBuf>,
    home_relative: &str,
) -> PathBuf {
    let base_dir = xdg_dir
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(home_relative)))
        .unwrap_or_else(|| PathBuf::from("."));

    base_dir.join(APP_DIR)
}
