//! Runtime configuration.
//!
//! Values come from three layers, highest precedence first: command-line
//! flags, `EPISODE_RENAMER_*` environment variables (a `.env` file is loaded
//! before parsing), then built-in defaults.

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::catalog::CatalogStore;
use crate::rename::{BackupOptions, PlanOptions, DEFAULT_SERIES_PREFIX};
use crate::rules::RuleStore;
use crate::scanner::ExtensionFilter;

pub const ENV_DATA_DIR: &str = "EPISODE_RENAMER_DATA_DIR";
pub const ENV_BACKUP_DIR: &str = "EPISODE_RENAMER_BACKUP_DIR";
pub const ENV_BACKUPS: &str = "EPISODE_RENAMER_BACKUPS";
pub const ENV_EXTENSIONS: &str = "EPISODE_RENAMER_EXTENSIONS";
pub const ENV_PREFIX: &str = "EPISODE_RENAMER_PREFIX";

const APP_DIR_NAME: &str = "episode-renamer";
const DEFAULT_EXTENSIONS: &str = "mkv,mp4";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// One partial source of configuration. Unset fields fall through to the
/// next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub data_dir: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
    pub create_backups: Option<bool>,
    /// Comma-separated extension list
    pub extensions: Option<String>,
    pub series_prefix: Option<String>,
}

impl ConfigLayer {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let create_backups = match lookup(ENV_BACKUPS) {
            Some(value) => Some(parse_bool(ENV_BACKUPS, &value)?),
            None => None,
        };

        Ok(Self {
            data_dir: lookup(ENV_DATA_DIR).map(PathBuf::from),
            backup_dir: lookup(ENV_BACKUP_DIR).map(PathBuf::from),
            create_backups,
            extensions: lookup(ENV_EXTENSIONS),
            series_prefix: lookup(ENV_PREFIX),
        })
    }

    /// Combine two layers, keeping this layer's values where both are set
    pub fn or(self, fallback: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            data_dir: self.data_dir.or(fallback.data_dir),
            backup_dir: self.backup_dir.or(fallback.backup_dir),
            create_backups: self.create_backups.or(fallback.create_backups),
            extensions: self.extensions.or(fallback.extensions),
            series_prefix: self.series_prefix.or(fallback.series_prefix),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub create_backups: bool,
    pub extensions: ExtensionFilter,
    pub series_prefix: String,
}

impl AppConfig {
    /// Resolve `cli` over the environment over the defaults
    pub fn load(cli: ConfigLayer) -> Result<Self, ConfigError> {
        Self::resolve(cli.or(ConfigLayer::from_env()?))
    }

    pub fn resolve(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let data_dir = layer.data_dir.unwrap_or_else(default_data_dir);
        let backup_dir = layer
            .backup_dir
            .unwrap_or_else(|| data_dir.join("backups"));
        let extensions = layer
            .extensions
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.to_string());

        let config = Self {
            backup_dir,
            create_backups: layer.create_backups.unwrap_or(true),
            extensions: ExtensionFilter::parse(&extensions),
            series_prefix: layer
                .series_prefix
                .unwrap_or_else(|| DEFAULT_SERIES_PREFIX.to_string())
                .trim()
                .to_string(),
            data_dir,
        };

        config.validate()?;
        debug!(?config, "Configuration resolved");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_blank(&self.data_dir) {
            return Err(ConfigError::Empty("data directory"));
        }
        if is_blank(&self.backup_dir) {
            return Err(ConfigError::Empty("backup directory"));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Empty("extension list"));
        }
        if self.series_prefix.is_empty() {
            return Err(ConfigError::Empty("series prefix"));
        }
        Ok(())
    }

    pub fn catalog_store(&self) -> CatalogStore {
        CatalogStore::new(&self.data_dir)
    }

    pub fn rule_store(&self) -> RuleStore {
        RuleStore::new(&self.data_dir)
    }

    pub fn backup_options(&self) -> BackupOptions {
        if self.create_backups {
            BackupOptions::in_directory(&self.backup_dir)
        } else {
            BackupOptions::disabled()
        }
    }

    pub fn plan_options(&self, allow_overwrite: bool) -> PlanOptions {
        PlanOptions {
            extensions: self.extensions.clone(),
            series_prefix: self.series_prefix.clone(),
            allow_overwrite,
        }
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}
