use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    /// Missing or invalid credentials/settings, detected before any network call.
    Configuration(String),
    /// Caller supplied input that cannot start a run.
    Validation(String),
    /// Unsupported or corrupt document.
    Extraction(String),
    /// Malformed response, schema violation or non-2xx answer from an AI backend.
    ProviderProtocol(String),
    /// Backend answered with a well-formed but empty result set.
    EmptyResult(String),
    Network(String),
    NotFound(String),
    AlmSubmission(String),
    Io(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "configuration",
            AppError::Validation(_) => "validation",
            AppError::Extraction(_) => "extraction",
            AppError::ProviderProtocol(_) => "provider_protocol",
            AppError::EmptyResult(_) => "empty_result",
            AppError::Network(_) => "network",
            AppError::NotFound(_) => "not_found",
            AppError::AlmSubmission(_) => "alm_submission",
            AppError::Io(_) => "io",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Extraction(msg) => write!(f, "Document error: {}", msg),
            AppError::ProviderProtocol(msg) => write!(f, "AI provider error: {}", msg),
            AppError::EmptyResult(msg) => write!(f, "No test cases produced: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::AlmSubmission(msg) => write!(f, "ALM submission failed: {}", msg),
            AppError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
