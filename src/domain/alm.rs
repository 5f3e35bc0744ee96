use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlmPlatform {
    Jira,
    AzureDevops,
    Polarion,
}

impl fmt::Display for AlmPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlmPlatform::Jira => write!(f, "Jira"),
            AlmPlatform::AzureDevops => write!(f, "Azure DevOps"),
            AlmPlatform::Polarion => write!(f, "Polarion"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraSettings {
    pub instance_url: String,
    pub user_email: String,
    pub api_token: String,
    pub project_key: String,
    pub issue_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureDevOpsSettings {
    pub organization: String,
    pub project: String,
    pub personal_access_token: String,
    pub work_item_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarionSettings {
    pub server_url: String,
    pub username: String,
    pub password: String,
    pub project_id: String,
}

/// Credentials for every supported ALM platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlmSettings {
    pub jira: JiraSettings,
    pub azure_devops: AzureDevOpsSettings,
    pub polarion: PolarionSettings,
}

impl Default for AlmSettings {
    fn default() -> Self {
        Self {
            jira: JiraSettings {
                issue_type: "Test Case".to_string(),
                ..JiraSettings::default()
            },
            azure_devops: AzureDevOpsSettings {
                work_item_type: "Test Case".to_string(),
                ..AzureDevOpsSettings::default()
            },
            polarion: PolarionSettings::default(),
        }
    }
}

/// Outcome of one ticket creation attempt, as reported to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlmResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AlmResult {
    pub fn created(issue_key: impl Into<String>) -> Self {
        Self {
            success: true,
            issue_key: Some(issue_key.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            issue_key: None,
            error: Some(error.into()),
        }
    }
}
