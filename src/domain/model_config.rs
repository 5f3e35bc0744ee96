use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModelProvider {
    /// Schema-constrained hosted API (Gemini).
    Hosted,
    /// Free-form local completion server (Ollama).
    Local,
}

/// Which backend a run talks to, with optional per-run credentials.
///
/// Absent values fall back to the configured defaults when the provider is
/// built; blank strings are treated as absent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub provider: ModelProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_server_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_model_name: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::Hosted,
            api_key: None,
            local_server_url: None,
            local_model_name: None,
        }
    }
}

/// Picks the first non-blank value, trimmed.
pub fn resolve_setting(explicit: Option<&str>, fallback: Option<&str>) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| fallback.map(str::trim).filter(|value| !value.is_empty()))
        .map(|value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_explicit_value() {
        assert_eq!(
            resolve_setting(Some("run-key"), Some("default-key")),
            Some("run-key".to_string())
        );
    }

    #[test]
    fn test_resolve_treats_blank_as_absent() {
        assert_eq!(
            resolve_setting(Some("   "), Some("default-key")),
            Some("default-key".to_string())
        );
        assert_eq!(resolve_setting(Some(""), None), None);
        assert_eq!(resolve_setting(None, Some(" ")), None);
    }

    #[test]
    fn test_provider_wire_names() {
        let config: ModelConfig =
            serde_json::from_str(r#"{"provider":"LOCAL","localModelName":"llama3"}"#).unwrap();
        assert_eq!(config.provider, ModelProvider::Local);
        assert_eq!(config.local_model_name.as_deref(), Some("llama3"));
    }
}
