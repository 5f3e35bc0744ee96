use crate::domain::alm::{AlmPlatform, AlmResult, AlmSettings};
use crate::domain::error::{AppError, Result};
use crate::domain::test_case::{AlmStatus, AlmStatusUpdate, TestCase};
use crate::infrastructure::alm_clients::AlmGateway;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Applies `update` to the test case with `id`. Unknown ids are ignored and
/// reported as `false`.
pub fn update_alm_status(cases: &mut [TestCase], id: &str, update: AlmStatusUpdate) -> bool {
    let Some(case) = cases.iter_mut().find(|case| case.id == id) else {
        return false;
    };

    match update {
        AlmStatusUpdate::Loading => {
            case.alm_status = AlmStatus::Loading;
            case.alm_error = None;
        }
        AlmStatusUpdate::Success { issue_key } => {
            case.alm_status = AlmStatus::Success;
            case.alm_issue_key = Some(issue_key);
            case.alm_error = None;
        }
        AlmStatusUpdate::Error { message } => {
            case.alm_status = AlmStatus::Error;
            case.alm_error = Some(message);
        }
    }
    true
}

/// Files generated test cases as ALM tickets, one case per call.
///
/// Retrying after an error simply attempts creation again; there is no
/// de-duplication against tickets an earlier attempt may have created.
pub struct AlmSubmissionUseCase {
    gateway: Arc<dyn AlmGateway + Send + Sync>,
}

impl AlmSubmissionUseCase {
    pub fn new(gateway: Arc<dyn AlmGateway + Send + Sync>) -> Self {
        Self { gateway }
    }

    pub async fn submit(
        &self,
        test_case: &TestCase,
        platform: AlmPlatform,
        settings: &AlmSettings,
    ) -> AlmResult {
        match self.gateway.create_ticket(test_case, platform, settings).await {
            Ok(issue_key) => {
                info!(test_case = %test_case.id, %platform, issue_key = %issue_key, "ALM ticket created");
                AlmResult::created(issue_key)
            }
            Err(err) => {
                warn!(test_case = %test_case.id, %platform, error = %err, "ALM ticket creation failed");
                AlmResult::failed(err.to_string())
            }
        }
    }

    /// Submits one case from a shared suite and records LOADING, then the
    /// outcome, on that case only. The lock is not held while the ticket is
    /// being created, so submissions for different cases can overlap.
    pub async fn submit_tracked(
        &self,
        suite: &RwLock<Vec<TestCase>>,
        id: &str,
        platform: AlmPlatform,
        settings: &AlmSettings,
    ) -> Result<AlmResult> {
        let snapshot = {
            let mut cases = suite.write().await;
            if !update_alm_status(&mut cases, id, AlmStatusUpdate::Loading) {
                return Err(AppError::NotFound(format!("Test case {} does not exist.", id)));
            }
            cases
                .iter()
                .find(|case| case.id == id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Test case {} does not exist.", id)))?
        };

        let result = self.submit(&snapshot, platform, settings).await;

        let update = match (&result.issue_key, &result.error) {
            (Some(issue_key), _) if result.success => AlmStatusUpdate::Success {
                issue_key: issue_key.clone(),
            },
            (_, error) => AlmStatusUpdate::Error {
                message: error
                    .clone()
                    .unwrap_or_else(|| "Unknown ALM error.".to_string()),
            },
        };
        update_alm_status(&mut suite.write().await, id, update);

        Ok(result)
    }
}
