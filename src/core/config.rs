//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.sortit/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::import::MAX_IMPORT_BYTES;
use crate::core::repository::{DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT, MIN_RECENT_LIMIT};
use crate::core::store::default_data_dir;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SortitConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub data_dir: Option<PathBuf>,
    pub recent_limit: Option<usize>,
    pub transition_delay_ms: Option<u64>,
    pub log_level: Option<String>,
    pub storage_quota_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ImportConfig {
    pub max_file_bytes: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TRANSITION_DELAY_MS: u64 = 300;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

pub const DATA_DIR_ENV: &str = "SORTIT_DATA_DIR";
pub const RECENT_LIMIT_ENV: &str = "SORTIT_RECENT_LIMIT";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub recent_limit: usize,
    pub transition_delay: Duration,
    pub log_level: LevelFilter,
    pub storage_quota_bytes: Option<usize>,
    pub max_import_bytes: u64,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.sortit/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sortit").join("config.toml"))
}

/// Load config from `~/.sortit/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SortitConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SortitConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(SortitConfig::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<SortitConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(SortitConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SortitConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# SortIt Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# data_dir = "/home/me/.sortit/data"   # Or set SORTIT_DATA_DIR
# recent_limit = 20                    # Size of the Recent album, 20 to 50. Or SORTIT_RECENT_LIMIT
# transition_delay_ms = 300            # Pause before the next photo is shown
# log_level = "debug"                  # "error", "warn", "info", "debug", "trace"
# storage_quota_bytes = 52428800       # Total size of stored data, unlimited if unset

# [import]
# max_file_bytes = 10485760            # Largest accepted image
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &SortitConfig, cli_data_dir: Option<&Path>) -> ResolvedConfig {
    resolve_with_env(config, cli_data_dir, |key| std::env::var(key).ok())
}

/// [`resolve`] with the environment lookup supplied by the caller.
pub fn resolve_with_env(
    config: &SortitConfig,
    cli_data_dir: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Data dir: CLI → env → config → default
    let data_dir = cli_data_dir
        .map(Path::to_path_buf)
        .or_else(|| env(DATA_DIR_ENV).map(PathBuf::from))
        .or_else(|| config.general.data_dir.clone())
        .unwrap_or_else(default_data_dir);

    // Recent limit: env → config → default, then clamped
    let recent_limit = env(RECENT_LIMIT_ENV)
        .and_then(|v| match v.trim().parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                warn!("Ignoring {}={:?}: not a number", RECENT_LIMIT_ENV, v);
                None
            }
        })
        .or(config.general.recent_limit)
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(MIN_RECENT_LIMIT, MAX_RECENT_LIMIT);

    let log_level = match config.general.log_level.as_deref() {
        Some(level) => level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level '{}', using {}", level, DEFAULT_LOG_LEVEL);
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    };

    ResolvedConfig {
        data_dir,
        recent_limit,
        transition_delay: Duration::from_millis(
            config
                .general
                .transition_delay_ms
                .unwrap_or(DEFAULT_TRANSITION_DELAY_MS),
        ),
        log_level,
        storage_quota_bytes: config.general.storage_quota_bytes,
        max_import_bytes: config.import.max_file_bytes.unwrap_or(MAX_IMPORT_BYTES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&SortitConfig::default(), None, no_env);
        assert_eq!(resolved.recent_limit, DEFAULT_RECENT_LIMIT);
        assert_eq!(resolved.transition_delay, Duration::from_millis(300));
        assert_eq!(resolved.log_level, LevelFilter::Debug);
        assert_eq!(resolved.storage_quota_bytes, None);
        assert_eq!(resolved.max_import_bytes, MAX_IMPORT_BYTES);
        assert_eq!(resolved.data_dir, default_data_dir());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = SortitConfig {
            general: GeneralConfig {
                data_dir: Some(PathBuf::from("/srv/photos")),
                recent_limit: Some(30),
                transition_delay_ms: Some(0),
                log_level: Some("warn".to_string()),
                storage_quota_bytes: Some(1024),
            },
            import: ImportConfig {
                max_file_bytes: Some(2048),
            },
        };
        let resolved = resolve_with_env(&config, None, no_env);
        assert_eq!(resolved.data_dir, PathBuf::from("/srv/photos"));
        assert_eq!(resolved.recent_limit, 30);
        assert_eq!(resolved.transition_delay, Duration::ZERO);
        assert_eq!(resolved.log_level, LevelFilter::Warn);
        assert_eq!(resolved.storage_quota_bytes, Some(1024));
        assert_eq!(resolved.max_import_bytes, 2048);
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config = SortitConfig {
            general: GeneralConfig {
                data_dir: Some(PathBuf::from("/from/config")),
                recent_limit: Some(25),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = |key: &str| match key {
            DATA_DIR_ENV => Some("/from/env".to_string()),
            RECENT_LIMIT_ENV => Some("40".to_string()),
            _ => None,
        };

        let resolved = resolve_with_env(&config, None, env);
        assert_eq!(resolved.data_dir, PathBuf::from("/from/env"));
        assert_eq!(resolved.recent_limit, 40);

        let resolved = resolve_with_env(&config, Some(Path::new("/from/cli")), env);
        assert_eq!(resolved.data_dir, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_recent_limit_is_clamped_and_bad_env_ignored() {
        let config = SortitConfig {
            general: GeneralConfig {
                recent_limit: Some(500),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve_with_env(&config, None, no_env).recent_limit, 50);

        let garbage = |key: &str| (key == RECENT_LIMIT_ENV).then(|| "lots".to_string());
        assert_eq!(resolve_with_env(&config, None, garbage).recent_limit, 50);

        let tiny = |key: &str| (key == RECENT_LIMIT_ENV).then(|| "3".to_string());
        assert_eq!(resolve_with_env(&config, None, tiny).recent_limit, 20);
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let config = SortitConfig {
            general: GeneralConfig {
                log_level: Some("chatty".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            resolve_with_env(&config, None, no_env).log_level,
            DEFAULT_LOG_LEVEL
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[general]
recent_limit = 35
"#;
        let config: SortitConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.recent_limit, Some(35));
        assert!(config.general.data_dir.is_none());
        assert!(config.import.max_file_bytes.is_none());
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
[general]
data_dir = "/tmp/sortit"
recent_limit = 20
transition_delay_ms = 150
log_level = "info"
storage_quota_bytes = 5000000

[import]
max_file_bytes = 1048576
"#;
        let config: SortitConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.data_dir, Some(PathBuf::from("/tmp/sortit")));
        assert_eq!(config.general.transition_delay_ms, Some(150));
        assert_eq!(config.import.max_file_bytes, Some(1_048_576));
    }

    #[test]
    fn test_missing_file_generates_parseable_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let config = load_config_from(&path).unwrap();
        assert!(config.general.recent_limit.is_none());
        assert!(path.exists());

        // The generated file is all comments and loads as the default
        let reloaded = load_config_from(&path).unwrap();
        assert!(reloaded.general.data_dir.is_none());
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[general\nrecent_limit = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
