use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::{Validate, ValidationError};

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are an expert Software Quality Assurance Engineer specializing in mission-critical healthcare systems. You write precise, verifiable test cases that trace directly to the requirement under test.";

pub const DEFAULT_CATEGORIES: [&str; 3] = ["Positive", "Negative", "Edge Case"];

/// Generation parameters for one batch run.
///
/// `categories` is the closed vocabulary every generated test case must use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub system_instruction: String,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(min = 1))]
    pub max_output_tokens: u32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 100))]
    pub top_k: Option<u32>,
    #[validate(length(min = 1), custom(function = "validate_categories"))]
    pub categories: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            temperature: 0.3,
            max_output_tokens: 8192,
            top_p: 0.95,
            top_k: None,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[allow(clippy::ptr_arg)]
fn validate_categories(categories: &Vec<String>) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for category in categories {
        if category.trim().is_empty() {
            return Err(ValidationError::new("blank_category"));
        }
        if !seen.insert(category.as_str()) {
            return Err(ValidationError::new("duplicate_category"));
        }
    }
    Ok(())
}
