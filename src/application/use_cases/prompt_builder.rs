use crate::domain::generation_config::GenerationConfig;

pub const DOCUMENT_START_MARKER: &str = "--- BEGIN DOCUMENT CONTENT ---";
pub const DOCUMENT_END_MARKER: &str = "--- END DOCUMENT CONTENT ---";

/// Builds the provider-agnostic user prompt.
///
/// Order: task framing, category vocabulary, quoted requirement, then the
/// delimited document block when document text is present. Document text is
/// passed through whole; length limits belong to the provider.
pub fn build_prompt(
    requirement: &str,
    document_text: Option<&str>,
    config: &GenerationConfig,
) -> String {
    let mut body = String::new();
    body.push_str("Your task is to analyze the following software requirement");
    if document_text.is_some() {
        body.push_str(" and the accompanying requirement document");
    }
    body.push_str(" and generate a comprehensive suite of test cases.\n");
    body.push_str("Cover the primary success scenario, invalid inputs and error conditions, and boundary conditions where they apply.\n");
    body.push_str("For each test case, define the category, a concise title, the actor, the specific action (including conditions), the precise expected outcome, and, when relevant, pre-conditions and test data.\n");

    body.push_str("\nAllowed categories (use these exact values and no others):\n");
    for category in &config.categories {
        body.push_str(&format!("- {}\n", category));
    }

    let requirement = requirement.trim();
    if requirement.is_empty() {
        body.push_str("\nRequirement: (none provided; derive the requirements from the document below)\n");
    } else {
        body.push_str(&format!("\nRequirement: \"{}\"\n", requirement));
    }

    if let Some(text) = document_text {
        body.push('\n');
        body.push_str(DOCUMENT_START_MARKER);
        body.push('\n');
        body.push_str(text);
        body.push('\n');
        body.push_str(DOCUMENT_END_MARKER);
        body.push('\n');
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GenerationConfig {
        GenerationConfig {
            categories: vec!["Positive".into(), "Negative".into()],
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_sections_in_order() {
        let prompt = build_prompt("Users can log in.", Some("Section 1: Login"), &config());
        let framing = prompt.find("Your task is").unwrap();
        let categories = prompt.find("- Positive\n- Negative").unwrap();
        let requirement = prompt.find("Requirement: \"Users can log in.\"").unwrap();
        let document = prompt.find(DOCUMENT_START_MARKER).unwrap();
        assert!(framing < categories && categories < requirement && requirement < document);
        assert!(prompt.contains("Section 1: Login\n--- END DOCUMENT CONTENT ---"));
    }

    #[test]
    fn test_no_document_block_without_text() {
        let prompt = build_prompt("Test the feature", None, &config());
        assert!(!prompt.contains(DOCUMENT_START_MARKER));
        assert!(!prompt.contains("accompanying requirement document"));
    }

    #[test]
    fn test_blank_requirement_with_document() {
        let prompt = build_prompt("  ", Some("The system shall allow login."), &config());
        assert!(prompt.contains("none provided"));
        assert!(prompt.contains("The system shall allow login."));
    }

    #[test]
    fn test_empty_document_text_is_still_delimited() {
        let prompt = build_prompt("", Some(""), &config());
        assert!(prompt.contains(&format!("{}\n\n{}", DOCUMENT_START_MARKER, DOCUMENT_END_MARKER)));
    }

    #[test]
    fn test_document_is_never_truncated() {
        let long = "x".repeat(200_000);
        let prompt = build_prompt("r", Some(&long), &config());
        assert!(prompt.contains(&long));
    }

    #[test]
    fn test_deterministic() {
        let a = build_prompt("r", Some("d"), &config());
        let b = build_prompt("r", Some("d"), &config());
        assert_eq!(a, b);
    }
}
