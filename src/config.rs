//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\kinosync\config.toml
//! - macOS: ~/Library/Application Support/kinosync/config.toml
//! - Linux: ~/.config/kinosync/config.toml
//!
//! The config file is human-readable and editable. Loading never fails:
//! a missing or unparseable file falls back to defaults with a warning.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sync pass behavior
    pub sync: SyncConfig,

    /// External metadata provider credentials
    pub providers: ProvidersConfig,

    /// Local library layout
    pub library: LibraryConfig,

    /// Host indexer coordination
    pub host: HostConfig,
}

/// Sync pass settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Concurrent item workers; 0 sizes automatically from core count
    pub concurrency: u32,

    /// Skip external identifier resolution entirely
    pub skip_external_metadata: bool,

    /// Countries whose availability windows are ingested, in query order
    pub countries: Vec<String>,

    /// Ask the host to clean its index before each scan
    pub auto_clean: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: 0,
            skip_external_metadata: false,
            countries: Vec::new(),
            auto_clean: false,
        }
    }
}

/// Provider API keys
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// TMDB API key for identifier resolution
    pub tmdb_api_key: Option<String>,

    /// OMDb API key, used when no TMDB key is configured
    pub omdb_api_key: Option<String>,
}

/// Local library settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Root directory for generated library entries
    pub path: Option<PathBuf>,

    /// Base URL written into playback pointer files
    pub base_url: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: None,
            base_url: "plugin://kinosync".to_string(),
        }
    }
}

/// Host indexer coordination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Seconds between host busy-state polls
    pub poll_interval_secs: u64,

    /// Overall idle-wait budget in seconds (timeout is non-fatal)
    pub idle_timeout_secs: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 1,
            idle_timeout_secs: 300,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kinosync"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}
