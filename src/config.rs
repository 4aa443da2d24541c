use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::clients::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::{Result, UnpackerError};

/// Main configuration structure loaded from metaphor_unpacker.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Text-generation provider settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub base_url: String,
    /// 0 disables the request timeout.
    pub timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 0,
        }
    }
}

/// Secrets and other values that never come from the config file
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration from the TOML file and environment variables.
    pub fn load() -> Result<Self> {
        // 1) UNPACKER_ENV_FILE if set, otherwise ./.env
        if let Ok(env_path) = std::env::var("UNPACKER_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path = std::env::var("UNPACKER_CONFIG")
            .unwrap_or_else(|_| "metaphor_unpacker.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| UnpackerError::Config {
            message: format!("Failed to read {}: {}", path.as_ref().display(), e),
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Env-first overrides. `lookup` is `std::env::var` in production.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(model) = lookup("GEMINI_MODEL").filter(|v| !v.trim().is_empty()) {
            self.generation.model = model;
        }
        if let Some(base_url) = lookup("GEMINI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.generation.base_url = base_url;
        }
        if let Some(timeout_ms) = lookup("GEMINI_TIMEOUT_MS").and_then(|v| v.parse::<u64>().ok())
        {
            self.generation.timeout_ms = timeout_ms;
        }

        // A missing key is not fatal: suggestion calls just come back empty
        self.runtime.api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|k| !k.trim().is_empty());
        if self.runtime.api_key.is_none() {
            tracing::warn!("No GEMINI_API_KEY/API_KEY set; AI suggestions are disabled");
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.generation.model.trim().is_empty() {
            return Err(UnpackerError::Config {
                message: "generation.model must not be empty".into(),
            });
        }
        if self.generation.base_url.trim().is_empty() {
            return Err(UnpackerError::Config {
                message: "generation.base_url must not be empty".into(),
            });
        }
        Ok(())
    }
}
