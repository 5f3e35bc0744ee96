use super::schema::{parse_records, response_schema};
use super::TestCaseProvider;
use crate::domain::error::{AppError, Result};
use crate::domain::generation_config::GenerationConfig;
use crate::domain::test_case::GeneratedRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK", skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

/// Gemini `generateContent` with a response schema built from the run's categories.
pub struct HostedSchemaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HostedSchemaProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        model: String,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            model,
            api_key,
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "Missing API key for the hosted AI provider. Add one in Settings or configure a default key."
                    .to_string(),
            )
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model.trim()
        )
    }

    fn build_request(prompt: &str, config: &GenerationConfig) -> GeminiRequest {
        let system_instruction = if config.system_instruction.trim().is_empty() {
            None
        } else {
            Some(GeminiContent {
                parts: vec![GeminiPart {
                    text: config.system_instruction.clone(),
                }],
                role: None,
            })
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
                role: Some("user".to_string()),
            }],
            system_instruction,
            generation_config: GeminiGenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                top_k: config.top_k,
                max_output_tokens: config.max_output_tokens,
                response_mime_type: "application/json",
                response_schema: response_schema(&config.categories),
            },
        }
    }
}

fn candidate_text(response: GeminiResponse) -> Result<String> {
    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        AppError::ProviderProtocol("The AI model returned no candidates.".to_string())
    })?;
    let finish_reason = candidate.finish_reason;

    candidate
        .content
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            AppError::ProviderProtocol(format!(
                "The AI model returned no text (finish reason: {}).",
                finish_reason.as_deref().unwrap_or("unknown")
            ))
        })
}

#[async_trait]
impl TestCaseProvider for HostedSchemaProvider {
    fn name(&self) -> &'static str {
        "hosted"
    }

    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Vec<GeneratedRecord>> {
        let api_key = self.api_key()?;
        let body = Self::build_request(prompt, config);

        debug!(model = %self.model, prompt_chars = prompt.len(), "Calling hosted provider");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request to the hosted AI provider failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(%status, "Hosted provider returned an error status");
            return Err(AppError::ProviderProtocol(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: GeminiResponse = response.json().await.map_err(|e| {
            AppError::ProviderProtocol(format!("Failed to parse provider response: {}", e))
        })?;

        let text = candidate_text(json)?;
        parse_records(&text, &config.categories)
    }
}
