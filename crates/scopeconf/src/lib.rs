//! Minimal configuration loading for chordscope.
//!
//! Config files are loaded in order (later wins):
//! 1. `/etc/chordscope/config.toml` (system)
//! 2. `~/.config/chordscope/config.toml` (user)
//! 3. `./chordscope.toml` (local override)
//! 4. Environment variables (`CHORDSCOPE_*`)
//!
//! # Example Config
//!
//! ```toml
//! [display]
//! prefer_simple_spelling = true
//! force_bass_as_root = false
//!
//! [cache]
//! capacity = 256
//!
//! [telemetry]
//! log_level = "info"
//! ```

pub mod loader;

pub use loader::{discover_config_files, discover_config_files_with_override, ConfigSources};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Notation display preferences. These are the only settings that feed
/// analysis requests; everything else is presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Favor fewer accidentals over strictly diatonic spelling.
    /// Default: true
    #[serde(default = "DisplayConfig::default_prefer_simple_spelling")]
    pub prefer_simple_spelling: bool,

    /// Always read the lowest sounding note as the root.
    /// Default: false
    #[serde(default)]
    pub force_bass_as_root: bool,
}

impl DisplayConfig {
    fn default_prefer_simple_spelling() -> bool {
        true
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            prefer_simple_spelling: Self::default_prefer_simple_spelling(),
            force_bass_as_root: false,
        }
    }
}

/// Analysis cache sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of memoized analysis results.
    /// Default: 256
    #[serde(default = "CacheConfig::default_capacity")]
    pub capacity: usize,
}

impl CacheConfig {
    fn default_capacity() -> usize {
        256
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level (trace, debug, info, warn, error).
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}

/// Complete chordscope configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScopeConfig {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl ScopeConfig {
    /// Load configuration from all standard sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load with an explicit config file taking the place of the local
    /// override.
    pub fn load_from(config_path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and report where values came from.
    pub fn load_with_sources_from(
        config_path: Option<&std::path::Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut partial = loader::PartialConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            let file_partial = loader::load_from_file(&path)?;
            partial = loader::merge_partials(partial, file_partial);
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut partial, &mut sources);

        Ok((partial.finalize(), sources))
    }
}
