//! Front-end settings read from the environment.
//!
//! Only the binary reads these; library types take explicit values.
//!
//! | Variable                        | Default                  |
//! |---------------------------------|--------------------------|
//! | `CARDIOSCREEN_MODEL_DIR`        | `models`                 |
//! | `CARDIOSCREEN_THRESHOLD`        | `0.5`                    |
//! | `CARDIOSCREEN_REQUIRE_MANIFEST` | `false`                  |
//! | `CARDIOSCREEN_LOG_MODE`         | `auto`                   |
//! | `CARDIOSCREEN_LOG_FILE`         | `logs/cardioscreen.log`  |

use std::path::PathBuf;

use crate::adapters::JsonArtifactStore;
use crate::domain::{ConfigError, DecisionPolicy};

pub const MODEL_DIR_VAR: &str = "CARDIOSCREEN_MODEL_DIR";
pub const THRESHOLD_VAR: &str = "CARDIOSCREEN_THRESHOLD";
pub const REQUIRE_MANIFEST_VAR: &str = "CARDIOSCREEN_REQUIRE_MANIFEST";
pub const LOG_MODE_VAR: &str = "CARDIOSCREEN_LOG_MODE";
pub const LOG_FILE_VAR: &str = "CARDIOSCREEN_LOG_FILE";

const DEFAULT_MODEL_DIR: &str = "models";
const DEFAULT_LOG_FILE: &str = "logs/cardioscreen.log";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal (logs would corrupt the TUI), stdout otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

impl std::str::FromStr for LogMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            _ => Err(ConfigError::InvalidSetting {
                name: LOG_MODE_VAR.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub policy: DecisionPolicy,
    pub require_manifest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            policy: DecisionPolicy::default(),
            require_manifest: false,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which returns a variable's value if set.
    ///
    /// # Errors
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(MODEL_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.model_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(THRESHOLD_VAR) {
            let threshold: f64 = raw.trim().parse().map_err(|_| ConfigError::InvalidSetting {
                name: THRESHOLD_VAR.to_string(),
                value: raw.clone(),
            })?;
            config.policy = DecisionPolicy::new(threshold)?;
        }

        if let Some(raw) = lookup(REQUIRE_MANIFEST_VAR) {
            config.require_manifest = parse_bool(REQUIRE_MANIFEST_VAR, &raw)?;
        }

        if let Some(raw) = lookup(LOG_MODE_VAR) {
            config.log_mode = raw.parse()?;
        }

        if let Some(file) = lookup(LOG_FILE_VAR).filter(|v| !v.trim().is_empty()) {
            config.log_file = PathBuf::from(file);
        }

        Ok(config)
    }

    /// Artifact store for the configured model directory.
    #[must_use]
    pub fn artifact_store(&self) -> JsonArtifactStore {
        JsonArtifactStore::new(self.model_dir.clone()).require_manifest(self.require_manifest)
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
        "0" | "false" | "FALSE" | "no" | "NO" | "" => Ok(false),
        _ => Err(ConfigError::InvalidSetting {
            name: name.to_string(),
            value: raw.to_string(),
        }),
    }
}
