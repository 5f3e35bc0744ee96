pub mod azure_devops;
pub mod jira;
pub mod polarion;

use crate::domain::alm::{AlmPlatform, AlmSettings};
use crate::domain::error::{AppError, Result};
use crate::domain::test_case::TestCase;
use async_trait::async_trait;
use azure_devops::AzureDevOpsClient;
use jira::JiraClient;
use polarion::PolarionClient;
use std::time::Duration;

/// Creates one ticket/work item per call and returns its platform identifier.
#[async_trait]
pub trait AlmGateway {
    async fn create_ticket(
        &self,
        test_case: &TestCase,
        platform: AlmPlatform,
        settings: &AlmSettings,
    ) -> Result<String>;
}

pub struct AlmRouter {
    jira: JiraClient,
    azure_devops: AzureDevOpsClient,
    polarion: PolarionClient,
}

impl AlmRouter {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            jira: JiraClient::new(client.clone()),
            azure_devops: AzureDevOpsClient::new(client.clone()),
            polarion: PolarionClient::new(client),
        }
    }
}

impl Default for AlmRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlmGateway for AlmRouter {
    async fn create_ticket(
        &self,
        test_case: &TestCase,
        platform: AlmPlatform,
        settings: &AlmSettings,
    ) -> Result<String> {
        match platform {
            AlmPlatform::Jira => self.jira.create(test_case, &settings.jira).await,
            AlmPlatform::AzureDevops => {
                self.azure_devops
                    .create(test_case, &settings.azure_devops)
                    .await
            }
            AlmPlatform::Polarion => self.polarion.create(test_case, &settings.polarion).await,
        }
    }
}

pub(crate) fn require<'a>(value: &'a str, field: &str, platform: AlmPlatform) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Configuration(format!(
            "{} {} is not configured.",
            platform, field
        )));
    }
    Ok(trimmed)
}

pub(crate) async fn read_success_json(
    response: reqwest::Response,
    platform: AlmPlatform,
) -> Result<serde_json::Value> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(AppError::AlmSubmission(format!(
            "{} API error ({}): {}",
            platform, status, text
        )));
    }
    response.json().await.map_err(|e| {
        AppError::AlmSubmission(format!("Failed to parse {} response: {}", platform, e))
    })
}

/// Plain-text body shared by the ticket descriptions.
pub(crate) fn describe_test_case(test_case: &TestCase) -> String {
    let mut body = String::new();
    body.push_str(&format!("Original Requirement: {}\n", test_case.requirement));
    body.push_str(&format!("Category: {}\n", test_case.category));
    if let Some(source) = &test_case.source_file {
        body.push_str(&format!("Source: {}\n", source));
    }
    if let Some(pre) = &test_case.pre_conditions {
        body.push_str(&format!("\nPre-conditions: {}\n", pre));
    }
    if let Some(data) = &test_case.test_data {
        body.push_str(&format!("Test Data: {}\n", data));
    }
    body.push_str("\nTest Steps:\n");
    for step in &test_case.steps {
        body.push_str(&format!("{}. As {}, {}.\n", step.step_number, step.actor, step.action));
    }
    body.push_str(&format!("\nExpected Result: {}", test_case.expected_result));
    body
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank() {
        let err = require("  ", "instance URL", AlmPlatform::Jira).unwrap_err();
        assert_eq!(
            err,
            AppError::Configuration("Jira instance URL is not configured.".to_string())
        );
        assert_eq!(require(" HTP ", "project key", AlmPlatform::Jira).unwrap(), "HTP");
    }

    #[test]
    fn test_description_includes_optional_fields_only_when_present() {
        let text = describe_test_case(&fixtures::test_case());
        assert!(text.contains("Original Requirement: The system shall allow login."));
        assert!(text.contains("Pre-conditions: account exists"));
        assert!(!text.contains("Test Data"));
        assert!(text.contains("1. As a user, logs in with valid credentials."));
        assert!(text.ends_with("Expected Result: dashboard is shown"));
    }

    #[tokio::test]
    async fn test_router_validates_credentials_before_network() {
        let router = AlmRouter::new();
        let settings = AlmSettings::default();
        for platform in [AlmPlatform::Jira, AlmPlatform::AzureDevops, AlmPlatform::Polarion] {
            let err = router
                .create_ticket(&fixtures::test_case(), platform, &settings)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Configuration(_)), "{platform}");
        }
    }
}
