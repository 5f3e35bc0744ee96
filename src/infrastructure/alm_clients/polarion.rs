use super::{describe_test_case, read_success_json, require};
use crate::domain::alm::{AlmPlatform, PolarionSettings};
use crate::domain::error::{AppError, Result};
use crate::domain::test_case::TestCase;
use serde_json::{json, Value};
use tracing::info;

pub struct PolarionClient {
    client: reqwest::Client,
}

impl PolarionClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn create(&self, test_case: &TestCase, settings: &PolarionSettings) -> Result<String> {
        let platform = AlmPlatform::Polarion;
        let server_url = require(&settings.server_url, "server URL", platform)?;
        let username = require(&settings.username, "username", platform)?;
        let password = require(&settings.password, "password", platform)?;
        let project_id = require(&settings.project_id, "project id", platform)?;

        let url = format!(
            "{}/polarion/rest/v1/projects/{}/workitems",
            server_url.trim_end_matches('/'),
            project_id
        );

        info!(project = project_id, test_case = %test_case.id, "Creating Polarion work item");

        let response = self
            .client
            .post(&url)
            .basic_auth(username, Some(password))
            .header("Accept", "application/json")
            .json(&build_payload(test_case))
            .send()
            .await?;

        let body = read_success_json(response, platform).await?;
        work_item_id(&body)
    }
}

pub(crate) fn build_payload(test_case: &TestCase) -> Value {
    json!({
        "data": [{
            "type": "workitems",
            "attributes": {
                "type": "testcase",
                "title": test_case.title,
                "description": {
                    "type": "text/plain",
                    "value": describe_test_case(test_case),
                },
            }
        }]
    })
}

/// Polarion ids look like `PROJECT/WI-123`; only the work item part is kept.
fn work_item_id(body: &Value) -> Result<String> {
    body.get("data")
        .and_then(|data| data.get(0))
        .and_then(|item| item.get("id"))
        .and_then(|id| id.as_str())
        .map(|id| id.rsplit('/').next().unwrap_or(id).to_string())
        .ok_or_else(|| {
            AppError::AlmSubmission("Polarion response did not include a work item id.".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::alm_clients::fixtures;

    #[test]
    fn test_payload_shape() {
        let payload = build_payload(&fixtures::test_case());
        let attributes = &payload["data"][0]["attributes"];
        assert_eq!(payload["data"][0]["type"], "workitems");
        assert_eq!(attributes["type"], "testcase");
        assert_eq!(attributes["title"], "Valid login");
    }

    #[test]
    fn test_work_item_id_strips_project() {
        let body = json!({"data": [{"type": "workitems", "id": "HealthApp/HA-77"}]});
        assert_eq!(work_item_id(&body).unwrap(), "HA-77");
        assert!(work_item_id(&json!({"data": []})).is_err());
    }
}
