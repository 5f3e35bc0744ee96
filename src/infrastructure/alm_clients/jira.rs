use super::{describe_test_case, read_success_json, require};
use crate::domain::alm::{AlmPlatform, JiraSettings};
use crate::domain::error::{AppError, Result};
use crate::domain::test_case::TestCase;
use serde_json::{json, Value};
use tracing::info;

pub struct JiraClient {
    client: reqwest::Client,
}

impl JiraClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn create(&self, test_case: &TestCase, settings: &JiraSettings) -> Result<String> {
        let base_url = require(&settings.instance_url, "instance URL", AlmPlatform::Jira)?;
        let email = require(&settings.user_email, "user email", AlmPlatform::Jira)?;
        let token = require(&settings.api_token, "API token", AlmPlatform::Jira)?;
        let project_key = require(&settings.project_key, "project key", AlmPlatform::Jira)?;

        let url = format!("{}/rest/api/2/issue", base_url.trim_end_matches('/'));
        let payload = build_payload(test_case, project_key, &settings.issue_type);

        info!(project = project_key, test_case = %test_case.id, "Creating Jira issue");

        let response = self
            .client
            .post(&url)
            .basic_auth(email, Some(token))
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await?;

        let body = read_success_json(response, AlmPlatform::Jira).await?;
        issue_key(&body)
    }
}

pub(crate) fn build_payload(test_case: &TestCase, project_key: &str, issue_type: &str) -> Value {
    let issue_type = if issue_type.trim().is_empty() {
        "Test Case"
    } else {
        issue_type.trim()
    };
    json!({
        "fields": {
            "project": { "key": project_key },
            "summary": test_case.title,
            "description": describe_test_case(test_case),
            "issuetype": { "name": issue_type },
        }
    })
}

fn issue_key(body: &Value) -> Result<String> {
    body.get("key")
        .and_then(|key| key.as_str())
        .map(|key| key.to_string())
        .ok_or_else(|| {
            AppError::AlmSubmission("Jira response did not include an issue key.".to_string())
        })
}
