// Configuration loading and parsing (config/tracker.toml).

use mockadp_core::adp::aggregate::TieBreak;
use mockadp_core::adp::identity::{IdentityResolver, IdentityStrategy};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Shipped defaults, written to config/ when no defaults/ directory is
/// available to copy from.
const DEFAULT_TRACKER_TOML: &str = include_str!("../defaults/tracker.toml");
const TRACKER_FILE: &str = "tracker.toml";
pub const USERNAME_ENV: &str = "SLEEPER_USERNAME";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: PathBuf,
    pub adp: AdpConfig,
    pub export: ExportConfig,
    pub sleeper: SleeperConfig,
    pub manual: ManualConfig,
}

impl Config {
    /// Identity resolver for the configured strategy and aliases.
    pub fn resolver(&self) -> IdentityResolver {
        IdentityResolver::new(self.adp.identity).with_aliases(self.adp.aliases.clone())
    }
}

// ---------------------------------------------------------------------------
// tracker.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire tracker.toml file.
#[derive(Debug, Clone, Deserialize)]
struct TrackerFile {
    store: StoreSection,
    adp: AdpConfig,
    export: ExportConfig,
    sleeper: SleeperConfig,
    manual: ManualConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct StoreSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdpConfig {
    pub min_drafts_hint: usize,
    #[serde(default)]
    pub identity: IdentityStrategy,
    #[serde(default)]
    pub tie_break: TieBreak,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub directory: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SleeperConfig {
    pub base_url: String,
    /// Empty in the file means unset.
    #[serde(default)]
    pub username: Option<String>,
    pub seasons: Vec<u16>,
    pub timeout_secs: u64,
    #[serde(default)]
    pub recent_days: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManualConfig {
    pub league_size: u32,
    pub rounds: u32,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/tracker.toml` relative to `base_dir`, with
/// environment overrides read through `env`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()`.
pub fn load_config_from(
    base_dir: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(TRACKER_FILE);
    let text = read_file(&path)?;
    let file: TrackerFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let mut sleeper = file.sleeper;
    if let Some(username) = env(USERNAME_ENV) {
        sleeper.username = Some(username);
    }
    sleeper.username = sleeper
        .username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    let config = Config {
        store_path: PathBuf::from(file.store.path),
        adp: file.adp,
        export: file.export,
        sleeper,
        manual: file.manual,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure config/tracker.toml exists, copying every missing file from
/// `defaults/` or, without a defaults directory, writing the built-in
/// tracker.toml. Existing files are never overwritten and `.example` files
/// are skipped. Returns the files created.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut created = Vec::new();

    if defaults_dir.is_dir() {
        let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults directory: {e}"),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read defaults entry: {e}"),
            })?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name() else {
                continue;
            };
            if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
                continue;
            }

            let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read {}: {e}", path.display()),
            })?;
            let target = config_dir.join(file_name);
            if write_new(&target, &content)? {
                created.push(target);
            }
        }
    }

    let tracker = config_dir.join(TRACKER_FILE);
    if write_new(&tracker, DEFAULT_TRACKER_TOML.as_bytes())? {
        created.push(tracker);
    }

    Ok(created)
}

/// Convenience wrapper: loads `.env`, then config relative to the current
/// working directory, creating default config files first.
pub fn load_config() -> Result<Config, ConfigError> {
    let _ = dotenvy::dotenv();
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd, |key| std::env::var(key).ok())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Create `target` with `content` unless it already exists. Returns whether
/// the file was written.
fn write_new(target: &Path, content: &[u8]) -> Result<bool, ConfigError> {
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.store_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "store.path".into(),
            message: "must not be empty".into(),
        });
    }

    if config.adp.min_drafts_hint == 0 {
        return Err(ConfigError::ValidationError {
            field: "adp.min_drafts_hint".into(),
            message: "must be at least 1".into(),
        });
    }

    if config.sleeper.seasons.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "sleeper.seasons".into(),
            message: "must list at least one season".into(),
        });
    }

    if config.sleeper.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "sleeper.timeout_secs".into(),
            message: "must be > 0".into(),
        });
    }

    if let Some(days) = config.sleeper.recent_days {
        if days < 0 {
            return Err(ConfigError::ValidationError {
                field: "sleeper.recent_days".into(),
                message: format!("must be >= 0, got {days}"),
            });
        }
    }

    let manual_fields: &[(&str, u32)] = &[
        ("manual.league_size", config.manual.league_size),
        ("manual.rounds", config.manual.rounds),
    ];
    for (name, val) in manual_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be at least 1".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
