//! Client configuration.
//!
//! Resolution order for `ClientConfig::load`: the `RECICLAJE_API_URL`
//! environment variable, then the default base URL. A TOML document with a
//! `base_url` key can be parsed with `ClientConfig::from_toml_str`.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const API_URL_ENV: &str = "RECICLAJE_API_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Environment first, default otherwise.
    pub fn load() -> Result<Self, ApiError> {
        Self::from_env_value(std::env::var(API_URL_ENV).ok())
    }

    fn from_env_value(value: Option<String>) -> Result<Self, ApiError> {
        let config = match value {
            Some(url) => Self::new(url),
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ApiError> {
        let config: Self = toml::from_str(contents).map_err(|e| ApiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ApiError::Config("base_url is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base_url must start with http:// or https://, got `{url}`"
            )));
        }
        Ok(())
    }
}
