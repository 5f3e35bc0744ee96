use crate::domain::test_case::{AlmStatus, GeneratedRecord, TestCase, TestStep};
use uuid::Uuid;

pub fn new_test_case_id() -> String {
    format!("TC-{}", Uuid::new_v4())
}

/// Turns one provider record into a tracked test case for `source_name`.
pub fn materialize(record: GeneratedRecord, requirement: &str, source_name: &str) -> TestCase {
    TestCase {
        id: new_test_case_id(),
        title: record.title,
        requirement: requirement.to_string(),
        category: record.category,
        steps: vec![TestStep {
            step_number: 1,
            actor: record.actor,
            action: record.action,
        }],
        expected_result: record.expected_outcome,
        pre_conditions: record.pre_conditions,
        test_data: record.test_data,
        source_file: Some(source_name.to_string()),
        alm_status: AlmStatus::Idle,
        alm_issue_key: None,
        alm_error: None,
    }
}

pub fn materialize_all(
    records: Vec<GeneratedRecord>,
    requirement: &str,
    source_name: &str,
) -> Vec<TestCase> {
    records
        .into_iter()
        .map(|record| materialize(record, requirement, source_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn record(title: &str) -> GeneratedRecord {
        GeneratedRecord {
            category: "Positive".into(),
            title: title.into(),
            actor: "a user".into(),
            action: "logs in with valid credentials".into(),
            expected_outcome: "dashboard is shown".into(),
            pre_conditions: None,
            test_data: Some(String::new()),
        }
    }

    #[test]
    fn test_materialize_fields() {
        let case = materialize(record("Valid login"), "Users can log in.", "reqs.pdf");
        assert!(case.id.starts_with("TC-"));
        assert_eq!(case.requirement, "Users can log in.");
        assert_eq!(case.source_file.as_deref(), Some("reqs.pdf"));
        assert_eq!(case.steps.len(), 1);
        assert_eq!(case.steps[0].step_number, 1);
        assert_eq!(case.steps[0].actor, "a user");
        assert_eq!(case.expected_result, "dashboard is shown");
        assert_eq!(case.alm_status, AlmStatus::Idle);
        assert!(case.alm_issue_key.is_none());
        assert!(case.alm_error.is_none());
    }

    #[test]
    fn test_absent_and_empty_optionals_are_preserved() {
        let case = materialize(record("t"), "", "Text Input");
        assert_eq!(case.pre_conditions, None);
        assert_eq!(case.test_data, Some(String::new()));
    }

    #[test]
    fn test_ids_are_unique() {
        let records = (0..50).map(|i| record(&format!("case {}", i))).collect();
        let cases = materialize_all(records, "r", "a.docx");
        let ids: HashSet<_> = cases.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), 50);
    }
}
