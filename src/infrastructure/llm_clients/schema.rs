//! Output contract shared by every provider: a JSON array of records whose
//! `category` belongs to the run's category vocabulary.

use crate::domain::error::{AppError, Result};
use crate::domain::test_case::GeneratedRecord;
use serde_json::{json, Value};

const INVALID_JSON_MESSAGE: &str = "The AI model returned an invalid JSON format.";

/// Response schema in the OpenAPI subset accepted by the hosted API.
pub fn response_schema(categories: &[String]) -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "category": {
                    "type": "STRING",
                    "description": format!("The category of the test case. Must be one of: {}.", quoted_list(categories)),
                    "enum": categories,
                },
                "title": {
                    "type": "STRING",
                    "description": "A concise, descriptive title for the test case (e.g., 'User logs in with invalid password').",
                },
                "actor": {
                    "type": "STRING",
                    "description": "The user or system performing the action (e.g., 'a user', 'an administrator').",
                },
                "action": {
                    "type": "STRING",
                    "description": "The specific action being performed, including conditions.",
                },
                "expectedOutcome": {
                    "type": "STRING",
                    "description": "The expected result or system response after the action is completed.",
                },
                "preConditions": {
                    "type": "STRING",
                    "description": "Any state that must hold before the test starts.",
                },
                "testData": {
                    "type": "STRING",
                    "description": "Concrete input values used by the test.",
                },
            },
            "required": ["category", "title", "actor", "action", "expectedOutcome"],
        }
    })
}

/// Plain-text rendering of the same contract for backends without a structured
/// output mode.
pub fn schema_description(categories: &[String]) -> String {
    format!(
        r#"Respond with ONLY a JSON array and nothing else: no prose, no markdown, no code fences.
Each element of the array must be an object with these fields:
- "category" (string, required): one of {}
- "title" (string, required): a concise, descriptive title for the test case
- "actor" (string, required): the user or system performing the action
- "action" (string, required): the specific action being performed, including conditions
- "expectedOutcome" (string, required): the expected result or system response
- "preConditions" (string, optional): state that must hold before the test starts
- "testData" (string, optional): concrete input values used by the test"#,
        quoted_list(categories)
    )
}

fn quoted_list(categories: &[String]) -> String {
    categories
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strictly parses raw model text into records and validates them.
///
/// Surrounding whitespace is the only thing tolerated around the array.
pub fn parse_records(raw: &str, categories: &[String]) -> Result<Vec<GeneratedRecord>> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| {
        AppError::ProviderProtocol(format!("{} ({})", INVALID_JSON_MESSAGE, e))
    })?;
    records_from_value(value, categories)
}

pub fn records_from_value(value: Value, categories: &[String]) -> Result<Vec<GeneratedRecord>> {
    let Value::Array(items) = value else {
        return Err(AppError::ProviderProtocol(
            "Invalid data structure received from the AI model. Expected an array of test cases."
                .to_string(),
        ));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let record: GeneratedRecord = serde_json::from_value(item).map_err(|e| {
            AppError::ProviderProtocol(format!(
                "Test case #{} does not match the expected structure: {}",
                index + 1,
                e
            ))
        })?;
        records.push(record);
    }

    validate_records(&records, categories)?;
    Ok(records)
}

/// Rejects empty result sets and categories outside the run's vocabulary.
pub fn validate_records(records: &[GeneratedRecord], categories: &[String]) -> Result<()> {
    if records.is_empty() {
        return Err(AppError::EmptyResult(
            "The AI model returned an empty list of test cases.".to_string(),
        ));
    }

    if let Some(record) = records
        .iter()
        .find(|record| !categories.iter().any(|c| c == &record.category))
    {
        return Err(AppError::ProviderProtocol(format!(
            "Test case '{}' has category '{}', which is not one of {}.",
            record.title,
            record.category,
            quoted_list(categories)
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<String> {
        vec!["Positive".to_string(), "Negative".to_string()]
    }

    const VALID: &str = r#"[
        {"category":"Positive","title":"Valid login","actor":"a user","action":"logs in with valid credentials","expectedOutcome":"dashboard is shown"},
        {"category":"Negative","title":"Wrong password","actor":"a user","action":"logs in with a wrong password","expectedOutcome":"access is denied","testData":"password=nope"}
    ]"#;

    #[test]
    fn test_parse_valid_array() {
        let records = parse_records(VALID, &categories()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].expected_outcome, "dashboard is shown");
        assert_eq!(records[0].pre_conditions, None);
        assert_eq!(records[1].test_data.as_deref(), Some("password=nope"));
    }

    #[test]
    fn test_rejects_surrounding_prose() {
        let raw = format!("Here are your test cases:\n{}", VALID);
        let err = parse_records(&raw, &categories()).unwrap_err();
        assert!(matches!(err, AppError::ProviderProtocol(_)));
        assert!(err.to_string().contains("invalid JSON format"));
    }

    #[test]
    fn test_rejects_code_fences() {
        let raw = format!("```json\n{}\n```", VALID);
        assert!(matches!(
            parse_records(&raw, &categories()),
            Err(AppError::ProviderProtocol(_))
        ));
    }

    #[test]
    fn test_rejects_non_array() {
        let err = parse_records(r#"{"testCases": []}"#, &categories()).unwrap_err();
        assert!(err.to_string().contains("Expected an array"));
    }

    #[test]
    fn test_rejects_missing_mandatory_field() {
        let raw = r#"[{"category":"Positive","title":"t","actor":"a","action":"b"}]"#;
        let err = parse_records(raw, &categories()).unwrap_err();
        assert!(matches!(err, AppError::ProviderProtocol(_)));
        assert!(err.to_string().contains("#1"));
    }

    #[test]
    fn test_empty_array_is_empty_result() {
        assert!(matches!(
            parse_records("[]", &categories()),
            Err(AppError::EmptyResult(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_category() {
        let raw = r#"[{"category":"Edge Case","title":"t","actor":"a","action":"b","expectedOutcome":"c"}]"#;
        let err = parse_records(raw, &categories()).unwrap_err();
        assert!(matches!(err, AppError::ProviderProtocol(_)));
        assert!(err.to_string().contains("Edge Case"));
    }

    #[test]
    fn test_schema_enum_follows_categories() {
        let schema = response_schema(&categories());
        assert_eq!(
            schema["items"]["properties"]["category"]["enum"],
            json!(["Positive", "Negative"])
        );
        assert_eq!(schema["items"]["required"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_schema_description_lists_categories() {
        let text = schema_description(&categories());
        assert!(text.contains("'Positive', 'Negative'"));
        assert!(text.contains("expectedOutcome"));
    }
}
