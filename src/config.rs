use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_STORAGE_KEY: &str = "notes.app.notes";
/// Same order of magnitude as a browser's local storage allowance.
pub const DEFAULT_STORE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Settings read from `config.yml` in the platform config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_key: String,
    pub data_dir: Option<PathBuf>,
    pub store_quota_bytes: Option<usize>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: None,
            store_quota_bytes: Some(DEFAULT_STORE_QUOTA_BYTES),
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Config> {
        match config_path() {
            Some(path) => Config::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        let config: Config =
            serde_yaml::from_str(&data).with_context(|| format!("parsing {:?}", path))?;
        Ok(config)
    }
}

fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "jotter").map(|dirs| dirs.config_dir().join("config.yml"))
}
