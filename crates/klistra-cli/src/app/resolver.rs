//! Path resolution for config and database files.

use std::path::{Path, PathBuf};

use crate::config::{default_config_path, default_db_path, KlistraConfig};
use crate::constants::CONFIG_ENV;

/// Resolve the config file path, checking KLISTRA_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the database path: flag or KLISTRA_DB, then config, then XDG data dir.
pub fn resolve_db_path(flag: Option<&str>, config: &KlistraConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag.filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.storage.path.as_deref() {
        return Ok(PathBuf::from(path));
    }
    default_db_path()
}

/// Error message when the database file is missing.
pub fn missing_db_message(path: &Path) -> String {
    format!("No paste database found at {}", path.display())
}
