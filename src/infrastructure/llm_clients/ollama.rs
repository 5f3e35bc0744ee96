use super::schema::{parse_records, schema_description};
use super::TestCaseProvider;
use crate::domain::error::{AppError, Result};
use crate::domain::generation_config::GenerationConfig;
use crate::domain::test_case::GeneratedRecord;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    num_predict: u32,
}

/// Local Ollama-style `/api/generate` endpoint without structured output.
///
/// The schema travels as text in front of the prompt and the reply must be
/// the bare JSON array.
pub struct LocalFreeformProvider {
    client: reqwest::Client,
    server_url: Option<String>,
    model_name: Option<String>,
}

impl LocalFreeformProvider {
    pub fn new(
        client: reqwest::Client,
        server_url: Option<String>,
        model_name: Option<String>,
    ) -> Self {
        Self {
            client,
            server_url,
            model_name,
        }
    }

    fn endpoint(&self) -> Result<Url> {
        let raw = self.server_url.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "Missing local model server URL. Add one in Settings or configure a default."
                    .to_string(),
            )
        })?;
        let base = Url::parse(&format!("{}/", raw.trim_end_matches('/'))).map_err(|e| {
            AppError::Configuration(format!("Invalid local model server URL '{}': {}", raw, e))
        })?;
        base.join("api/generate").map_err(|e| {
            AppError::Configuration(format!("Invalid local model server URL '{}': {}", raw, e))
        })
    }

    fn model_name(&self) -> Result<&str> {
        self.model_name.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "Missing local model name. Add one in Settings or configure a default.".to_string(),
            )
        })
    }

    fn build_prompt(prompt: &str, config: &GenerationConfig) -> String {
        format!("{}\n\n{}", schema_description(&config.categories), prompt)
    }
}

fn response_text(body: &serde_json::Value) -> Result<&str> {
    body.get("response")
        .and_then(|value| value.as_str())
        .ok_or_else(|| {
            AppError::ProviderProtocol(
                "The local model server response has no 'response' text field.".to_string(),
            )
        })
}

#[async_trait]
impl TestCaseProvider for LocalFreeformProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Vec<GeneratedRecord>> {
        let url = self.endpoint()?;
        let model = self.model_name()?;
        let system = Some(config.system_instruction.as_str()).filter(|s| !s.trim().is_empty());

        let body = OllamaRequest {
            model,
            prompt: Self::build_prompt(prompt, config),
            system,
            stream: false,
            options: OllamaOptions {
                temperature: config.temperature,
                top_p: config.top_p,
                top_k: config.top_k,
                num_predict: config.max_output_tokens,
            },
        };

        debug!(%url, model, "Calling local provider");

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Local model server is unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(%status, "Local provider returned an error status");
            return Err(AppError::Network(format!(
                "Local model server error ({}): {}",
                status, text
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            AppError::ProviderProtocol(format!("Failed to parse local model response: {}", e))
        })?;

        parse_records(response_text(&json)?, &config.categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm_clients::canned_server;

    fn provider(url: Option<&str>, model: Option<&str>) -> LocalFreeformProvider {
        LocalFreeformProvider::new(
            reqwest::Client::new(),
            url.map(String::from),
            model.map(String::from),
        )
    }

    #[test]
    fn test_endpoint_joins_api_path() {
        let p = provider(Some("http://localhost:11434/"), Some("llama3"));
        assert_eq!(
            p.endpoint().unwrap().as_str(),
            "http://localhost:11434/api/generate"
        );
    }

    #[test]
    fn test_invalid_url_is_configuration_error() {
        let p = provider(Some("not a url"), Some("llama3"));
        assert!(matches!(p.endpoint(), Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_prompt_starts_with_schema_block() {
        let config = GenerationConfig::default();
        let prompt = LocalFreeformProvider::build_prompt("Requirement: \"x\"", &config);
        assert!(prompt.starts_with("Respond with ONLY a JSON array"));
        assert!(prompt.ends_with("Requirement: \"x\""));
    }

    #[test]
    fn test_response_text_field() {
        let body = serde_json::json!({"model": "llama3", "response": "[]", "done": true});
        assert_eq!(response_text(&body).unwrap(), "[]");

        let missing = serde_json::json!({"model": "llama3", "done": true});
        assert!(matches!(
            response_text(&missing),
            Err(AppError::ProviderProtocol(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_settings_fail_before_network() {
        let config = GenerationConfig::default();

        let err = provider(None, Some("llama3"))
            .generate("p", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));

        let err = provider(Some("http://127.0.0.1:9"), None)
            .generate("p", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_error_status_is_network_error() {
        let url = canned_server::respond_once(500, r#"{"error":"model 'llama3' not found"}"#).await;
        let err = provider(Some(&url), Some("llama3"))
            .generate("p", &GenerationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let url = canned_server::unreachable_url().await;
        let err = provider(Some(&url), Some("llama3"))
            .generate("p", &GenerationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
    }

    #[tokio::test]
    async fn test_generates_records_from_response_field() {
        let records = r#"[{"category":"Negative","title":"Locked account","actor":"a user","action":"logs in after five failures","expectedOutcome":"access is denied"}]"#;
        let body = serde_json::json!({ "model": "llama3", "response": records, "done": true });
        let url = canned_server::respond_once(200, &body.to_string()).await;

        let generated = provider(Some(&url), Some("llama3"))
            .generate("p", &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].title, "Locked account");
    }
}
