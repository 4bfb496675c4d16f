// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{OcrError, Result};
use crate::parser::DEFAULT_PAGE_SEPARATOR;
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const API_KEY_ENV: &str = "MISTRAL_API_KEY";
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub retry_attempts: usize,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub include_images: bool,
    pub page_separator: String,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

// Keeps the key out of debug output.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| OcrError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("MISTRAL_OCR")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| OcrError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| OcrError::Config(e.to_string()))?;

        if config.api.api_key.is_none() {
            config.api.api_key = api_key_from_env();
        }

        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults plus `MISTRAL_API_KEY`, for when layered loading fails.
    pub fn default_with_env() -> Self {
        let mut config = Self::default_config();
        config.api.api_key = api_key_from_env();
        config
    }

    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                api_key: None,
                base_url: "https://api.mistral.ai".to_string(),
                model: "mistral-ocr-latest".to_string(),
                timeout_secs: 120,
                retry_attempts: 2,
                retry_backoff_ms: 500,
            },
            output: OutputConfig {
                include_images: true,
                page_separator: DEFAULT_PAGE_SEPARATOR.to_string(),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.api.base_url)
            .map_err(|e| OcrError::Config(format!("api.base_url: {}", e)))?;

        if self.api.model.trim().is_empty() {
            return Err(OcrError::Config("api.model must not be empty".to_string()));
        }

        if self.api.timeout_secs == 0 {
            return Err(OcrError::Config(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}
