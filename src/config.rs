//! Construction-time configuration for the API wrapper and the loaders
//!
//! Values come from explicit structs. The environment is only consulted by the
//! `from_env` helpers, which the binaries call at start-up.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::RepositoryId;

pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_APP_ID: &str = "GITHUB_APP_ID";
pub const ENV_APP_PRIVATE_KEY: &str = "GITHUB_APP_PRIVATE_KEY";
pub const ENV_PERSONAL_ACCESS_TOKEN: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";
pub const ENV_API_URL: &str = "GITHUB_API_URL";

/// Configuration failures detected before any request is sent
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingRepository,
    MissingAppId,
    MissingPrivateKey,
    MissingAccessToken,
    EmptyRepository,
    InvalidRepository(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRepository => write!(f, "{} is required", ENV_REPOSITORY),
            Self::MissingAppId => write!(f, "{} is required", ENV_APP_ID),
            Self::MissingPrivateKey => write!(f, "{} is required", ENV_APP_PRIVATE_KEY),
            Self::MissingAccessToken => write!(
                f,
                "{} environment variable is required",
                ENV_PERSONAL_ACCESS_TOKEN
            ),
            Self::EmptyRepository => write!(f, "repository cannot be empty"),
            Self::InvalidRepository(details) => write!(f, "{}", details),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for [`crate::wrapper::GitHubApiWrapper`].
///
/// Every field is optional so that a TOML file, the environment and CLI flags
/// can be layered with [`WrapperConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapperConfig {
    /// `owner/repo`
    pub repository: Option<String>,
    pub app_id: Option<String>,
    /// Used directly as the bearer credential
    pub private_key: Option<String>,
    /// Working branch; defaults to the repository's default branch
    pub active_branch: Option<String>,
    /// Protected PR target; defaults to the repository's default branch
    pub base_branch: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// A [`WrapperConfig`] whose required fields have been checked
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub repository: RepositoryId,
    pub app_id: String,
    pub private_key: String,
    pub active_branch: Option<String>,
    pub base_branch: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout: Option<Duration>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_value(key: &str) -> Option<String> {
    non_empty(std::env::var(key).ok())
}

impl WrapperConfig {
    pub fn new<T: Into<String>>(repository: T, app_id: T, private_key: T) -> Self {
        Self {
            repository: Some(repository.into()),
            app_id: Some(app_id.into()),
            private_key: Some(private_key.into()),
            ..Default::default()
        }
    }

    /// Read `GITHUB_REPOSITORY`, `GITHUB_APP_ID`, `GITHUB_APP_PRIVATE_KEY` and
    /// `GITHUB_API_URL`
    pub fn from_env() -> Self {
        Self {
            repository: env_value(ENV_REPOSITORY),
            app_id: env_value(ENV_APP_ID),
            private_key: env_value(ENV_APP_PRIVATE_KEY),
            api_base_url: env_value(ENV_API_URL),
            ..Default::default()
        }
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Fill every unset field from `fallback`
    pub fn merge(self, fallback: Self) -> Self {
        Self {
            repository: non_empty(self.repository).or(fallback.repository),
            app_id: non_empty(self.app_id).or(fallback.app_id),
            private_key: non_empty(self.private_key).or(fallback.private_key),
            active_branch: non_empty(self.active_branch).or(fallback.active_branch),
            base_branch: non_empty(self.base_branch).or(fallback.base_branch),
            api_base_url: non_empty(self.api_base_url).or(fallback.api_base_url),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
        }
    }

    pub fn with_env_fallback(self) -> Self {
        self.merge(Self::from_env())
    }

    /// Check required fields in the order repository, app id, private key,
    /// then the `owner/repo` shape.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let repository = non_empty(self.repository.clone()).ok_or(ConfigError::MissingRepository)?;
        let app_id = non_empty(self.app_id.clone()).ok_or(ConfigError::MissingAppId)?;
        let private_key = non_empty(self.private_key.clone()).ok_or(ConfigError::MissingPrivateKey)?;
        let repository = RepositoryId::parse(&repository).map_err(ConfigError::InvalidRepository)?;

        Ok(ValidatedConfig {
            repository,
            app_id,
            private_key,
            active_branch: non_empty(self.active_branch.clone()),
            base_branch: non_empty(self.base_branch.clone()),
            api_base_url: non_empty(self.api_base_url.clone()),
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Resolve a loader access token, falling back to `GITHUB_PERSONAL_ACCESS_TOKEN`
pub fn resolve_access_token(explicit: Option<String>) -> Result<String, ConfigError> {
    non_empty(explicit)
        .or_else(|| env_value(ENV_PERSONAL_ACCESS_TOKEN))
        .ok_or(ConfigError::MissingAccessToken)
}
