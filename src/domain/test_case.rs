use serde::{Deserialize, Serialize};

/// Raw record produced by a provider, before it becomes a [`TestCase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRecord {
    pub category: String,
    pub title: String,
    pub actor: String,
    pub action: String,
    pub expected_outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    pub step_number: u32,
    pub actor: String,
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlmStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub title: String,
    pub requirement: String,
    pub category: String,
    pub steps: Vec<TestStep>,
    pub expected_result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    pub alm_status: AlmStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alm_issue_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alm_error: Option<String>,
}

/// A change to the ALM tracking fields of one test case.
#[derive(Debug, Clone, PartialEq)]
pub enum AlmStatusUpdate {
    Loading,
    Success { issue_key: String },
    Error { message: String },
}
