use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EXPIRY_SECONDS;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KlistraConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub paste: PasteSection,
    #[serde(default)]
    pub sweeper: SweeperSection,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageSection {
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasteSection {
    pub default_expiry_seconds: u64,
}

impl Default for PasteSection {
    fn default() -> Self {
        Self {
            default_expiry_seconds: DEFAULT_EXPIRY_SECONDS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweeperSection {
    pub interval_seconds: u64,
}

impl Default for SweeperSection {
    fn default() -> Self {
        Self {
            interval_seconds: klistra_core::DEFAULT_SWEEP_INTERVAL.as_secs(),
        }
    }
}

impl KlistraConfig {
    pub fn new(db_path: PathBuf, default_expiry_seconds: u64, interval_seconds: u64) -> Self {
        Self {
            storage: StorageSection {
                path: Some(db_path.to_string_lossy().to_string()),
            },
            paste: PasteSection {
                default_expiry_seconds,
            },
            sweeper: SweeperSection { interval_seconds },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("klistra.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<KlistraConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &KlistraConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("klistra"));
        }
    }
    Ok(home_dir()?.join(".config").join("klistra"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("klistra"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("klistra"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
