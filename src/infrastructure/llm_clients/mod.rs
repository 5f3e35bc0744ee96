pub mod gemini;
pub mod ollama;
pub mod schema;

use crate::domain::error::Result;
use crate::domain::generation_config::GenerationConfig;
use crate::domain::model_config::{resolve_setting, ModelConfig, ModelProvider};
use crate::domain::test_case::GeneratedRecord;
use crate::infrastructure::config::AppConfig;
use async_trait::async_trait;
use gemini::HostedSchemaProvider;
use ollama::LocalFreeformProvider;
use std::sync::Arc;
use std::time::Duration;

/// A backend that turns a composite prompt into validated records.
#[async_trait]
pub trait TestCaseProvider {
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Vec<GeneratedRecord>>;
}

pub type SharedProvider = Arc<dyn TestCaseProvider + Send + Sync>;

/// Builds the provider for one run from that run's model settings.
pub trait ProviderFactory {
    fn create(&self, model: &ModelConfig) -> SharedProvider;
}

/// Default factory: fills unset credentials from the application config.
pub struct LlmProviderFactory {
    hosted_client: reqwest::Client,
    local_client: reqwest::Client,
    config: AppConfig,
}

impl LlmProviderFactory {
    pub fn new(config: AppConfig) -> Self {
        Self {
            hosted_client: build_client(config.hosted.timeout_secs),
            local_client: build_client(config.local.timeout_secs),
            config,
        }
    }
}

fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

impl ProviderFactory for LlmProviderFactory {
    fn create(&self, model: &ModelConfig) -> SharedProvider {
        match model.provider {
            ModelProvider::Hosted => Arc::new(HostedSchemaProvider::new(
                self.hosted_client.clone(),
                self.config.hosted.base_url.clone(),
                self.config.hosted.model.clone(),
                resolve_setting(
                    model.api_key.as_deref(),
                    self.config.hosted.api_key.as_deref(),
                ),
            )),
            ModelProvider::Local => Arc::new(LocalFreeformProvider::new(
                self.local_client.clone(),
                resolve_setting(
                    model.local_server_url.as_deref(),
                    self.config.local.server_url.as_deref(),
                ),
                resolve_setting(
                    model.local_model_name.as_deref(),
                    self.config.local.model_name.as_deref(),
                ),
            )),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_selects_variant_by_provider() {
        let factory = LlmProviderFactory::new(AppConfig::default());

        let hosted = factory.create(&ModelConfig::default());
        assert_eq!(hosted.name(), "hosted");

        let local = factory.create(&ModelConfig {
            provider: ModelProvider::Local,
            ..ModelConfig::default()
        });
        assert_eq!(local.name(), "local");
    }
}
