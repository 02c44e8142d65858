//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub track: TrackConfig,

    #[serde(default)]
    pub danmaku: DanmakuConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Caption track configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrackConfig {
    /// Check loaded entries for inverted spans and ordering, and log findings
    #[serde(default = "default_validate_entries")]
    pub validate_entries: bool,

    /// Clock tick used by the playback simulation
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_validate_entries() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    50 // 20 polls per second
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            validate_entries: default_validate_entries(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

/// Danmaku timeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DanmakuConfig {
    /// Forward clock moves larger than this are treated as seeks
    #[serde(default = "default_jump_threshold")]
    pub jump_threshold_ms: i64,
}

fn default_jump_threshold() -> i64 {
    2000
}

impl Default for DanmakuConfig {
    fn default() -> Self {
        Self {
            jump_threshold_ms: default_jump_threshold(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        for path in Self::search_paths() {
            if path.exists() {
                match Self::load_with_env(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Config file locations, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("cueline").join("config.toml")),
            Some(PathBuf::from("/etc/cueline/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Track overrides
        if let Ok(validate) = std::env::var("CUELINE_VALIDATE_ENTRIES") {
            if let Ok(v) = validate.parse() {
                self.track.validate_entries = v;
            }
        }
        if let Ok(interval) = std::env::var("CUELINE_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.track.poll_interval_ms = ms;
            }
        }

        // Danmaku overrides
        if let Ok(threshold) = std::env::var("CUELINE_JUMP_THRESHOLD_MS") {
            if let Ok(ms) = threshold.parse() {
                self.danmaku.jump_threshold_ms = ms;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("CUELINE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CUELINE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Cueline Configuration
#
# Environment variables override these settings:
# - CUELINE_VALIDATE_ENTRIES
# - CUELINE_POLL_INTERVAL_MS
# - CUELINE_JUMP_THRESHOLD_MS
# - CUELINE_LOG_LEVEL
# - CUELINE_LOG_FORMAT

[track]
# Check loaded entries for inverted or out-of-order spans and log a warning
validate_entries = true

# Clock tick used by `cueline play` (ms)
poll_interval_ms = 50

[danmaku]
# Forward clock jumps larger than this are treated as seeks (ms)
jump_threshold_ms = 2000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert!(config.track.validate_entries);
        assert_eq!(config.track.poll_interval_ms, 50);
        assert_eq!(config.danmaku.jump_threshold_ms, 2000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();

        assert!(config.track.validate_entries);
        assert_eq!(config.track.poll_interval_ms, 50);
        assert_eq!(config.danmaku.jump_threshold_ms, 2000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[danmaku]\njump_threshold_ms = 500").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.danmaku.jump_threshold_ms, 500);
        // Missing sections fall back to defaults
        assert!(config.track.validate_entries);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[track]\npoll_interval_ms = \"fast\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_search_paths_end_with_working_dir() {
        let paths = Config::search_paths();
        assert_eq!(paths.last(), Some(&PathBuf::from("./config.toml")));
    }
}
