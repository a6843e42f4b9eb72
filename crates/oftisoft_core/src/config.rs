//! Environment-driven configuration for hosts of the content core.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; invalid log levels surface at logging init.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "OFTISOFT_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "OFTISOFT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "OFTISOFT_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "oftisoft_content.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// SQLite file backing the content gateway.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Rolling log directory; file logging is skipped when `None`.
    pub log_dir: Option<PathBuf>,
}

impl EditorConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        Self {
            db_path: value(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: value(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: value(ENV_LOG_DIR).map(PathBuf::from),
        }
    }
}
