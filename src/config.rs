// ⚙️ Configuration - database location and log level
//
// Precedence: CLI flag > environment > config.toml > built-in defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "mr-competitors";
pub const ENV_DB: &str = "MR_COMPETITORS_DB";
pub const ENV_LOG: &str = "MR_COMPETITORS_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        AppConfig {
            database_path: data_dir.join("competitors.db"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// `$CONFIG_DIR/mr-competitors/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load from the default location (if present) and apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => AppConfig::default(),
        };

        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn apply_env(&mut self) {
        self.apply_overrides(env::var(ENV_DB).ok(), env::var(ENV_LOG).ok());
    }

    fn apply_overrides(&mut self, database: Option<String>, log_level: Option<String>) {
        if let Some(db) = database.filter(|v| !v.is_empty()) {
            self.database_path = PathBuf::from(db);
        }
        if let Some(level) = log_level.filter(|v| !v.is_empty()) {
            self.log_level = level;
        }
    }

    /// Create the parent directory of a file-backed database
    pub fn ensure_database_dir(&self) -> Result<()> {
        if self.database_path.as_os_str() == crate::db::IN_MEMORY {
            return Ok(());
        }
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        Ok(())
    }
}
