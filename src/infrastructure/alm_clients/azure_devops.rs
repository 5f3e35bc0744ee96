use super::{describe_test_case, read_success_json, require};
use crate::domain::alm::{AlmPlatform, AzureDevOpsSettings};
use crate::domain::error::{AppError, Result};
use crate::domain::test_case::TestCase;
use serde_json::{json, Value};
use tracing::info;
use url::Url;

const AZURE_DEVOPS_BASE_URL: &str = "https://dev.azure.com/";
const API_VERSION: &str = "7.0";

pub struct AzureDevOpsClient {
    client: reqwest::Client,
    base_url: String,
}

impl AzureDevOpsClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: AZURE_DEVOPS_BASE_URL.to_string(),
        }
    }

    pub async fn create(
        &self,
        test_case: &TestCase,
        settings: &AzureDevOpsSettings,
    ) -> Result<String> {
        let platform = AlmPlatform::AzureDevops;
        let organization = require(&settings.organization, "organization", platform)?;
        let project = require(&settings.project, "project", platform)?;
        let token = require(&settings.personal_access_token, "personal access token", platform)?;
        let work_item_type = require(&settings.work_item_type, "work item type", platform)?;

        let url = work_item_url(&self.base_url, organization, project, work_item_type)?;
        let patch = build_patch(test_case);

        info!(organization, project, test_case = %test_case.id, "Creating Azure DevOps work item");

        let response = self
            .client
            .post(url)
            .basic_auth("", Some(token))
            .header("Content-Type", "application/json-patch+json")
            .body(patch.to_string())
            .send()
            .await?;

        let body = read_success_json(response, platform).await?;
        work_item_id(&body)
    }
}

pub(crate) fn work_item_url(
    base_url: &str,
    organization: &str,
    project: &str,
    work_item_type: &str,
) -> Result<Url> {
    let invalid = |detail: String| {
        AppError::Configuration(format!("Invalid Azure DevOps URL: {}", detail))
    };
    let type_segment = format!("${}", work_item_type);
    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid(base_url.to_string()))?
        .pop_if_empty()
        .extend([
            organization,
            project,
            "_apis",
            "wit",
            "workitems",
            type_segment.as_str(),
        ]);
    url.query_pairs_mut().append_pair("api-version", API_VERSION);
    Ok(url)
}

pub(crate) fn build_patch(test_case: &TestCase) -> Value {
    json!([
        { "op": "add", "path": "/fields/System.Title", "value": test_case.title },
        { "op": "add", "path": "/fields/Microsoft.VSTS.TCM.Steps", "value": steps_xml(test_case) },
        { "op": "add", "path": "/fields/Microsoft.VSTS.TCM.ExpectedResult", "value": test_case.expected_result },
        { "op": "add", "path": "/fields/System.Description", "value": describe_test_case(test_case) },
    ])
}

fn steps_xml(test_case: &TestCase) -> String {
    let mut xml = format!(
        r#"<steps id="0" last="{}">"#,
        test_case.steps.len()
    );
    for step in &test_case.steps {
        xml.push_str(&format!(
            r#"<step id="{}" type="ActionStep"><parameterizedString isformatted="true">{}</parameterizedString><parameterizedString isformatted="true">{}</parameterizedString><description/></step>"#,
            step.step_number,
            escape_xml(&format!("As {}, {}.", step.actor, step.action)),
            escape_xml(&test_case.expected_result)
        ));
    }
    xml.push_str("</steps>");
    xml
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn work_item_id(body: &Value) -> Result<String> {
    body.get("id")
        .and_then(|id| id.as_u64())
        .map(|id| id.to_string())
        .ok_or_else(|| {
            AppError::AlmSubmission(
                "Azure DevOps response did not include a work item id.".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::alm_clients::fixtures;

    #[test]
    fn test_work_item_url_encodes_type() {
        let url = work_item_url(AZURE_DEVOPS_BASE_URL, "myorg", "My Project", "Test Case").unwrap();
        assert_eq!(
            url.as_str(),
            "https://dev.azure.com/myorg/My%20Project/_apis/wit/workitems/$Test%20Case?api-version=7.0"
        );
    }

    #[test]
    fn test_patch_fields() {
        let patch = build_patch(&fixtures::test_case());
        let ops = patch.as_array().unwrap();
        assert_eq!(ops.len(), 4);
        assert_eq!(ops[0]["path"], "/fields/System.Title");
        assert_eq!(ops[0]["value"], "Valid login");
        let steps = ops[1]["value"].as_str().unwrap();
        assert!(steps.starts_with(r#"<steps id="0" last="1">"#));
        assert!(steps.contains("As a user, logs in with valid credentials."));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_work_item_id() {
        assert_eq!(work_item_id(&json!({"id": 1234, "rev": 1})).unwrap(), "1234");
        assert!(work_item_id(&json!({"rev": 1})).is_err());
    }
}
