//! Batch generation: one unit per uploaded file (or one text-only unit),
//! processed strictly in order, each unit's failure isolated from the rest.

use crate::application::use_cases::document_extraction::DocumentTextExtractor;
use crate::application::use_cases::materializer::materialize_all;
use crate::application::use_cases::prompt_builder::build_prompt;
use crate::domain::batch::{BatchFileStatus, BatchOutcome, BatchUnit};
use crate::domain::document::UploadedFile;
use crate::domain::error::{AppError, Result};
use crate::domain::generation_config::GenerationConfig;
use crate::domain::model_config::ModelConfig;
use crate::domain::test_case::TestCase;
use crate::infrastructure::llm_clients::schema::validate_records;
use crate::infrastructure::llm_clients::{ProviderFactory, TestCaseProvider};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use validator::Validate;

mod units;


pub use units::plan_units;

pub type ProgressSender = watch::Sender<Vec<BatchFileStatus>>;

/// Inputs of one run. Owning the configs is what snapshots them: later edits
/// to the caller's settings cannot reach units already in flight.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub requirement: String,
    pub files: Vec<UploadedFile>,
    pub generation: GenerationConfig,
    pub model: ModelConfig,
}

pub struct GenerationOrchestrator {
    extractor: Arc<dyn DocumentTextExtractor + Send + Sync>,
    providers: Arc<dyn ProviderFactory + Send + Sync>,
}

impl GenerationOrchestrator {
    pub fn new(
        extractor: Arc<dyn DocumentTextExtractor + Send + Sync>,
        providers: Arc<dyn ProviderFactory + Send + Sync>,
    ) -> Self {
        Self {
            extractor,
            providers,
        }
    }

    /// Runs every unit to a terminal status.
    ///
    /// Only the no-input precondition fails the whole run; every other error
    /// ends up in that unit's status. When `progress` is given it receives a
    /// full snapshot after initialization and after each transition.
    pub async fn run(
        &self,
        request: BatchRequest,
        progress: Option<&ProgressSender>,
    ) -> Result<BatchOutcome> {
        let BatchRequest {
            requirement,
            files,
            generation,
            model,
        } = request;

        let units = plan_units(&requirement, files)?;
        let started_at = Utc::now();

        let mut statuses: Vec<BatchFileStatus> = units
            .iter()
            .map(|unit| BatchFileStatus::pending(unit.name()))
            .collect();
        publish(progress, &statuses);

        let settings_check = generation.validate().map_err(|e| {
            AppError::Configuration(format!("Invalid generation settings: {}", e))
        });
        let provider = self.providers.create(&model);

        info!(
            units = units.len(),
            provider = provider.name(),
            "Starting batch generation"
        );

        let mut test_cases = Vec::new();
        for (index, unit) in units.iter().enumerate() {
            statuses[index].begin();
            publish(progress, &statuses);

            let result = match &settings_check {
                Ok(()) => {
                    self.process_unit(unit, &requirement, &generation, provider.as_ref())
                        .await
                }
                Err(err) => Err(err.clone()),
            };

            match result {
                Ok(cases) => {
                    info!(unit = %unit.name(), generated = cases.len(), "Unit succeeded");
                    statuses[index].succeed(cases.len());
                    test_cases.extend(cases);
                }
                Err(err) => {
                    warn!(unit = %unit.name(), kind = err.kind(), error = %err, "Unit failed");
                    statuses[index].fail(err.to_string());
                }
            }
            publish(progress, &statuses);
        }

        let outcome = BatchOutcome {
            test_cases,
            statuses,
            started_at,
            finished_at: Utc::now(),
        };
        let report = outcome.report();
        info!(
            succeeded = report.succeeded_units,
            failed = report.failed_units,
            generated = report.generated_test_cases,
            partial = report.is_partial(),
            "Batch generation finished"
        );

        Ok(outcome)
    }

    async fn process_unit(
        &self,
        unit: &BatchUnit,
        requirement: &str,
        generation: &GenerationConfig,
        provider: &(dyn TestCaseProvider + Send + Sync),
    ) -> Result<Vec<TestCase>> {
        let document_text = match unit {
            BatchUnit::File(file) => Some(self.extractor.extract_text(file).await?),
            BatchUnit::Text => None,
        };

        let prompt = build_prompt(requirement, document_text.as_deref(), generation);
        let records = provider.generate(&prompt, generation).await?;
        validate_records(&records, &generation.categories)?;

        Ok(materialize_all(records, requirement, unit.name()))
    }
}

fn publish(progress: Option<&ProgressSender>, statuses: &[BatchFileStatus]) {
    if let Some(sender) = progress {
        sender.send_replace(statuses.to_vec());
    }
}
