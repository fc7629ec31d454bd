//! Config file discovery, loading, and environment variable overlay.
//!
//! Files are parsed into a partial form where unset fields stay `None`,
//! so a later file can override exactly the fields it mentions and no
//! default value masks an earlier file's explicit setting.

use crate::{ConfigError, ScopeConfig};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/chordscope/config.toml");
    if system.exists() {
        files.push(system);
    }

    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("chordscope/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    // CLI override takes precedence over local
    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("chordscope.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// A config with every field optional; `None` means "not set here".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialConfig {
    #[serde(default)]
    pub display: PartialDisplay,
    #[serde(default)]
    pub cache: PartialCache,
    #[serde(default)]
    pub telemetry: PartialTelemetry,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialDisplay {
    pub prefer_simple_spelling: Option<bool>,
    pub force_bass_as_root: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialCache {
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialTelemetry {
    pub log_level: Option<String>,
}

impl PartialConfig {
    /// Resolve unset fields to their defaults.
    pub fn finalize(self) -> ScopeConfig {
        let mut config = ScopeConfig::default();
        if let Some(v) = self.display.prefer_simple_spelling {
            config.display.prefer_simple_spelling = v;
        }
        if let Some(v) = self.display.force_bass_as_root {
            config.display.force_bass_as_root = v;
        }
        if let Some(v) = self.cache.capacity {
            config.cache.capacity = v;
        }
        if let Some(v) = self.telemetry.log_level {
            config.telemetry.log_level = v;
        }
        config
    }
}

/// Load a partial config from a TOML file.
pub fn load_from_file(path: &Path) -> Result<PartialConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Merge two partials; fields set in `overlay` win.
pub fn merge_partials(base: PartialConfig, overlay: PartialConfig) -> PartialConfig {
    PartialConfig {
        display: PartialDisplay {
            prefer_simple_spelling: overlay
                .display
                .prefer_simple_spelling
                .or(base.display.prefer_simple_spelling),
            force_bass_as_root: overlay
                .display
                .force_bass_as_root
                .or(base.display.force_bass_as_root),
        },
        cache: PartialCache {
            capacity: overlay.cache.capacity.or(base.cache.capacity),
        },
        telemetry: PartialTelemetry {
            log_level: overlay.telemetry.log_level.or(base.telemetry.log_level),
        },
    }
}

/// Overlay `CHORDSCOPE_*` environment variables onto the partial.
pub fn apply_env_overrides(partial: &mut PartialConfig, sources: &mut ConfigSources) {
    if let Some(v) = env_bool("CHORDSCOPE_PREFER_SIMPLE_SPELLING", sources) {
        partial.display.prefer_simple_spelling = Some(v);
    }
    if let Some(v) = env_bool("CHORDSCOPE_FORCE_BASS_AS_ROOT", sources) {
        partial.display.force_bass_as_root = Some(v);
    }
    if let Ok(value) = env::var("CHORDSCOPE_CACHE_CAPACITY") {
        if let Ok(capacity) = value.parse() {
            partial.cache.capacity = Some(capacity);
            sources.env_overrides.push("CHORDSCOPE_CACHE_CAPACITY".into());
        }
    }
    if let Ok(value) = env::var("CHORDSCOPE_LOG_LEVEL") {
        partial.telemetry.log_level = Some(value);
        sources.env_overrides.push("CHORDSCOPE_LOG_LEVEL".into());
    }
}

fn env_bool(name: &str, sources: &mut ConfigSources) -> Option<bool> {
    let value = env::var(name).ok()?;
    let parsed = match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    };
    if parsed.is_some() {
        sources.env_overrides.push(name.to_string());
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("chordscope.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_from_file_reads_partial_settings() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "[cache]\ncapacity = 32\n");
        let partial = load_from_file(&path).unwrap();
        assert_eq!(partial.cache.capacity, Some(32));
        assert_eq!(partial.display.force_bass_as_root, None);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "[display\n");
        match load_from_file(&path) {
            Err(ConfigError::Parse { .. }) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn overlay_wins_only_where_set() {
        let base: PartialConfig =
            toml::from_str("[display]\nprefer_simple_spelling = false\n\n[cache]\ncapacity = 16\n")
                .unwrap();
        let overlay: PartialConfig = toml::from_str("[cache]\ncapacity = 64\n").unwrap();

        let merged = merge_partials(base, overlay).finalize();
        assert!(!merged.display.prefer_simple_spelling);
        assert_eq!(merged.cache.capacity, 64);
    }

    #[test]
    fn finalize_fills_defaults() {
        let config = PartialConfig::default().finalize();
        assert!(config.display.prefer_simple_spelling);
        assert_eq!(config.cache.capacity, 256);
        assert_eq!(config.telemetry.log_level, "info");
    }

    // Env vars are process-global, so all overlay coverage lives in one
    // test to keep parallel test runs from racing on them.
    #[test]
    fn env_overlay_applies_parses_and_records_sources() {
        let mut partial = PartialConfig::default();
        let mut sources = ConfigSources::default();

        env::set_var("CHORDSCOPE_FORCE_BASS_AS_ROOT", "yes");
        env::set_var("CHORDSCOPE_PREFER_SIMPLE_SPELLING", "maybe");
        env::set_var("CHORDSCOPE_CACHE_CAPACITY", "64");
        apply_env_overrides(&mut partial, &mut sources);

        assert_eq!(partial.display.force_bass_as_root, Some(true));
        // Unparseable boolean is ignored, not treated as false.
        assert_eq!(partial.display.prefer_simple_spelling, None);
        assert_eq!(partial.cache.capacity, Some(64));

        let recorded = |name: &str| sources.env_overrides.iter().any(|s| s == name);
        assert!(recorded("CHORDSCOPE_FORCE_BASS_AS_ROOT"));
        assert!(recorded("CHORDSCOPE_CACHE_CAPACITY"));
        assert!(!recorded("CHORDSCOPE_PREFER_SIMPLE_SPELLING"));

        // Unparseable capacity is ignored and not recorded either.
        env::remove_var("CHORDSCOPE_FORCE_BASS_AS_ROOT");
        env::remove_var("CHORDSCOPE_PREFER_SIMPLE_SPELLING");
        env::set_var("CHORDSCOPE_CACHE_CAPACITY", "lots");
        let mut partial = PartialConfig::default();
        let mut sources = ConfigSources::default();
        apply_env_overrides(&mut partial, &mut sources);
        assert_eq!(partial.cache.capacity, None);
        assert!(sources.env_overrides.is_empty());

        env::remove_var("CHORDSCOPE_CACHE_CAPACITY");
    }

    #[test]
    fn missing_cli_override_is_skipped() {
        let files = discover_config_files_with_override(Some(Path::new("/nonexistent/x.toml")));
        // Must not include the nonexistent path.
        assert!(files.iter().all(|p| p != Path::new("/nonexistent/x.toml")));
    }
}
