use std::path::{Path, PathBuf};

use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::workplace::{Registry, RegistryError, Workplace};
use crate::repository::file::default_data_dir;
use crate::repository::{EntryRepository, FileEntryRepository, MemoryEntryRepository};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const ENV_PREFIX: &str = "WORKHOURS_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("Invalid workplace list: {0}")]
    Registry(#[from] RegistryError),
}

/// Where entries are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// `<data_dir>/entries.json`
    #[default]
    Local,
    /// `<folder>/work-hours.json` in a cloud-drive folder.
    Synced { folder: PathBuf },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: Option<PathBuf>,
    pub backend: BackendConfig,
    /// Replaces the built-in workplaces when set.
    pub workplaces: Option<Vec<Workplace>>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            backend: BackendConfig::Local,
            workplaces: None,
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Config file (explicit path, or `<data_dir>/config.toml`), then
    /// `WORKHOURS_*` environment variables. Missing files are fine.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_data_dir()
                .map(|d| d.join(CONFIG_FILE_NAME))
                .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME)),
        };

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    pub fn registry(&self) -> Result<Registry, ConfigError> {
        match &self.workplaces {
            Some(list) => Ok(Registry::new(list.clone())?),
            None => Ok(Registry::default()),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    /// Opens the configured store; `ephemeral` swaps in an in-memory one.
    pub fn open_repository(&self, ephemeral: bool) -> Result<Box<dyn EntryRepository>> {
        if ephemeral {
            return Ok(Box::new(MemoryEntryRepository::new()));
        }
        match &self.backend {
            BackendConfig::Local => Ok(Box::new(FileEntryRepository::new(Some(self.data_dir()?))?)),
            BackendConfig::Synced { folder } => Ok(Box::new(FileEntryRepository::synced(folder))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(text: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::from_figment(Figment::new().merge(Toml::string(text)))
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.backend, BackendConfig::Local);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.registry().unwrap().len(), 3);
    }

    #[test]
    fn test_synced_backend_and_custom_workplaces() {
        let config = from_toml(
            r#"
            log_level = "debug"

            [backend]
            kind = "synced"
            folder = "/mnt/drive/WorkHours"

            [[workplaces]]
            name = "Studio"
            weekday_rate = 100
            saturday_rate = 140
            allows_saturday = true

            [[workplaces]]
            name = "Pool"
            weekday_rate = 90
            "#,
        )
        .unwrap();

        assert_eq!(
            config.backend,
            BackendConfig::Synced {
                folder: PathBuf::from("/mnt/drive/WorkHours")
            }
        );
        let registry = config.registry().unwrap();
        assert_eq!(registry.names(), vec!["Studio", "Pool"]);
        let pool = registry.get("Pool").unwrap();
        assert!(!pool.allows_saturday);
        assert_eq!(pool.saturday_rate, 0.0);
    }

    #[test]
    fn test_invalid_workplaces_are_reported() {
        let config = from_toml(
            r#"
            [[workplaces]]
            name = "Twice"
            weekday_rate = 1
            [[workplaces]]
            name = "Twice"
            weekday_rate = 2
            "#,
        )
        .unwrap();
        assert!(matches!(config.registry(), Err(ConfigError::Registry(_))));
    }

    #[test]
    fn test_ephemeral_repository() {
        let repo = AppConfig::default().open_repository(true).unwrap();
        assert!(repo.load().unwrap().is_empty());
        assert!(repo.describe().starts_with("memory"));
    }
}
