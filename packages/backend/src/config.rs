use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::error::{BackendError, BackendResult};

/// Environment variable overriding the project URL.
pub const ENV_PROJECT_URL: &str = "MINDTOWEB_BACKEND_URL";
/// Environment variable overriding the anonymous key.
pub const ENV_ANON_KEY: &str = "MINDTOWEB_BACKEND_ANON_KEY";

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    /// Base URL of the hosted backend project
    pub project_url: String,

    /// Anonymous (publishable) API key
    pub anon_key: String,
}

impl BackendConfig {
    /// Get the configuration file path
    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mindtoweb")
            .join("backend.toml")
    }

    pub fn new(project_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            project_url: project_url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// Load configuration from disk, falling back to environment variables
    /// when no file exists.
    pub async fn load() -> BackendResult<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Self::from_env();
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| BackendError::config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| BackendError::config(format!("Invalid config format: {}", e)))
    }

    /// Build configuration from environment variables.
    pub fn from_env() -> BackendResult<Self> {
        let project_url = std::env::var(ENV_PROJECT_URL)
            .map_err(|_| BackendError::config(format!("{} is not set", ENV_PROJECT_URL)))?;
        let anon_key = std::env::var(ENV_ANON_KEY)
            .map_err(|_| BackendError::config(format!("{} is not set", ENV_ANON_KEY)))?;

        Ok(Self {
            project_url,
            anon_key,
        })
    }

    /// Save configuration to disk
    pub async fn save(&self) -> BackendResult<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BackendError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| BackendError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .await
            .map_err(|e| BackendError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> BackendResult<()> {
        if self.project_url.is_empty() {
            return Err(BackendError::config("Project URL is required"));
        }
        if self.anon_key.is_empty() {
            return Err(BackendError::config("Anonymous key is required"));
        }
        if !self.project_url.starts_with("https://") && !self.project_url.starts_with("http://") {
            return Err(BackendError::config("Project URL must be an HTTP(S) URL"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_requires_credentials() {
        let mut config = BackendConfig::default();
        assert!(config.validate().is_err());

        config.project_url = "https://example.backend.co".to_string();
        assert!(config.validate().is_err());

        config.anon_key = "anon-key".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_non_http_urls() {
        let config = BackendConfig::new("ftp://example.backend.co", "anon-key");
        assert!(config.validate().is_err());
    }
}
