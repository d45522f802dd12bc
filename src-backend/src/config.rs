//! Backend Configuration
//!
//! Settings read from the environment (and a `.env` file when present).

use std::env;
use std::path::PathBuf;

use crate::domain::{DEFAULT_SHELF_NAME, DEFAULT_SHELF_TYPE};

pub const DB_PATH_VAR: &str = "PANTRY_DB_PATH";
pub const LOG_DIR_VAR: &str = "PANTRY_LOG_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// SQLite file, or `:memory:`
    pub db_path: PathBuf,
    /// Directory for the rolling log file; no file logging when unset
    pub log_dir: Option<PathBuf>,
    pub default_shelf_name: String,
    pub default_shelf_type: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(":memory:"),
            log_dir: None,
            default_shelf_name: DEFAULT_SHELF_NAME.to_string(),
            default_shelf_type: DEFAULT_SHELF_TYPE.to_string(),
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> Self {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            db_path: get(DB_PATH_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("pantry.db")),
            log_dir: get(LOG_DIR_VAR).filter(|v| !v.is_empty()).map(PathBuf::from),
            ..defaults
        }
    }
}
