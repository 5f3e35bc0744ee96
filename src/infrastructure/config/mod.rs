use crate::domain::alm::AlmSettings;
use crate::domain::error::{AppError, Result};
use crate::domain::generation_config::GenerationConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "qualimed.toml";
pub const ENV_PREFIX: &str = "QUALIMED_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Limit for JSON request bodies, which carry uploaded documents base64 encoded.
    pub max_body_mb: usize,
}

impl ServerConfig {
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            max_body_mb: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostedProviderConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for HostedProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalProviderConfig {
    pub server_url: Option<String>,
    pub model_name: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LocalProviderConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            model_name: None,
            timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub hosted: HostedProviderConfig,
    pub local: LocalProviderConfig,
    pub alm: AlmSettings,
    pub generation: GenerationConfig,
}

impl AppConfig {
    /// Defaults, then `qualimed.toml`, then `QUALIMED_*` env vars (`__` nests).
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::Configuration(format!("Failed to load settings: {}", e)))?;

        // The hosted key has historically been read from a bare API_KEY variable.
        if config.hosted.api_key.is_none() {
            config.hosted.api_key = std::env::var("API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        Ok(config)
    }
}
