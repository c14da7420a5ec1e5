// ABOUTME: Runtime configuration for the elbitat binary, read from the environment
// ABOUTME: Resolves the workspace, storage backend, media library and OpenAI settings

use std::path::PathBuf;
use std::str::FromStr;

use elbitat_ai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use elbitat_config::{constants, env_non_empty};
use elbitat_core::{default_workspace_dir, resolve_workspace_dir};
use elbitat_storage::StorageConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid storage backend: {0} (expected 'files' or 'sqlite')")]
    InvalidStorageBackend(String),
    #[error("Invalid OpenAI base URL: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Files,
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Files => "files",
            StorageBackend::Sqlite => "sqlite",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "files" | "file" | "json" => Ok(StorageBackend::Files),
            "sqlite" | "db" => Ok(StorageBackend::Sqlite),
            _ => Err(ConfigError::InvalidStorageBackend(s.to_string())),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub workspace: PathBuf,
    pub storage_backend: StorageBackend,
    pub database_path: PathBuf,
    pub media_library: PathBuf,
    pub openai_model: String,
    pub openai_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let preferred = env_non_empty(constants::ELBITAT_WORKSPACE)
            .map(PathBuf::from)
            .unwrap_or_else(default_workspace_dir);
        let workspace = resolve_workspace_dir(&preferred);

        let storage_backend = env_non_empty(constants::ELBITAT_STORAGE)
            .unwrap_or_else(|| "files".to_string())
            .parse::<StorageBackend>()?;

        let database_path = env_non_empty(constants::ELBITAT_DATABASE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| workspace.join("elbitat.db"));

        let media_library = env_non_empty(constants::ELBITAT_MEDIA_LIBRARY)
            .map(PathBuf::from)
            .unwrap_or_else(|| workspace.join("library"));

        let openai_model =
            env_non_empty(constants::OPENAI_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let openai_base_url = env_non_empty(constants::OPENAI_BASE_URL)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !openai_base_url.starts_with("http://") && !openai_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(openai_base_url));
        }

        Ok(Config {
            workspace,
            storage_backend,
            database_path,
            media_library,
            openai_model,
            openai_base_url,
        })
    }

    /// Store settings for a backend, using this config's paths
    pub fn storage_config_for(&self, backend: StorageBackend) -> StorageConfig {
        match backend {
            StorageBackend::Files => StorageConfig::Files {
                root: self.workspace.clone(),
            },
            StorageBackend::Sqlite => StorageConfig::Sqlite {
                path: self.database_path.clone(),
            },
        }
    }

    pub fn storage_config(&self) -> StorageConfig {
        self.storage_config_for(self.storage_backend)
    }
}
