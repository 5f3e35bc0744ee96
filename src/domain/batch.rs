use crate::domain::document::UploadedFile;
use crate::domain::test_case::TestCase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TEXT_UNIT_NAME: &str = "Text Input";

/// One independently processed item of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchUnit {
    File(UploadedFile),
    /// The requirement text on its own; only exists when no files were uploaded.
    Text,
}

impl BatchUnit {
    pub fn name(&self) -> &str {
        match self {
            BatchUnit::File(file) => &file.name,
            BatchUnit::Text => TEXT_UNIT_NAME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    Pending,
    Processing,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFileStatus {
    pub name: String,
    pub status: UnitStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_count: Option<usize>,
}

impl BatchFileStatus {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: UnitStatus::Pending,
            message: None,
            generated_count: None,
        }
    }

    /// PENDING -> PROCESSING. Returns false if the transition is not allowed.
    pub fn begin(&mut self) -> bool {
        if self.status != UnitStatus::Pending {
            return false;
        }
        self.status = UnitStatus::Processing;
        true
    }

    /// PROCESSING -> SUCCESS.
    pub fn succeed(&mut self, generated_count: usize) -> bool {
        if self.status != UnitStatus::Processing {
            return false;
        }
        self.status = UnitStatus::Success;
        self.generated_count = Some(generated_count);
        self.message = None;
        true
    }

    /// PROCESSING -> ERROR.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.status != UnitStatus::Processing {
            return false;
        }
        self.status = UnitStatus::Error;
        self.message = Some(message.into());
        self.generated_count = None;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitFailure {
    pub name: String,
    pub message: String,
}

/// Summary derived from a finished run's statuses; never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total_units: usize,
    pub succeeded_units: usize,
    pub failed_units: usize,
    pub generated_test_cases: usize,
    pub failures: Vec<UnitFailure>,
}

impl BatchReport {
    pub fn from_statuses(statuses: &[BatchFileStatus]) -> Self {
        let succeeded: Vec<&BatchFileStatus> = statuses
            .iter()
            .filter(|s| s.status == UnitStatus::Success)
            .collect();
        let failures: Vec<UnitFailure> = statuses
            .iter()
            .filter(|s| s.status == UnitStatus::Error)
            .map(|s| UnitFailure {
                name: s.name.clone(),
                message: s.message.clone().unwrap_or_default(),
            })
            .collect();

        Self {
            total_units: statuses.len(),
            succeeded_units: succeeded.len(),
            failed_units: failures.len(),
            generated_test_cases: succeeded
                .iter()
                .map(|s| s.generated_count.unwrap_or(0))
                .sum(),
            failures,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.succeeded_units > 0 && self.failed_units > 0
    }
}

/// Everything a finished run hands back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub test_cases: Vec<TestCase>,
    pub statuses: Vec<BatchFileStatus>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchOutcome {
    pub fn report(&self) -> BatchReport {
        BatchReport::from_statuses(&self.statuses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_monotonic() {
        let mut status = BatchFileStatus::pending("reqs.pdf");
        assert!(!status.succeed(3));
        assert!(status.begin());
        assert!(!status.begin());
        assert!(status.succeed(3));
        assert!(!status.fail("late failure"));
        assert_eq!(status.status, UnitStatus::Success);
        assert_eq!(status.generated_count, Some(3));
        assert!(status.message.is_none());
    }

    #[test]
    fn test_error_sets_message_only() {
        let mut status = BatchFileStatus::pending("broken.docx");
        status.begin();
        assert!(status.fail("corrupt"));
        assert_eq!(status.status, UnitStatus::Error);
        assert_eq!(status.message.as_deref(), Some("corrupt"));
        assert!(status.generated_count.is_none());
        assert!(!status.begin());
    }

    #[test]
    fn test_report_counts() {
        let mut ok = BatchFileStatus::pending("a.pdf");
        ok.begin();
        ok.succeed(4);
        let mut bad = BatchFileStatus::pending("b.pdf");
        bad.begin();
        bad.fail("Unsupported file type");
        let mut ok2 = BatchFileStatus::pending("c.docx");
        ok2.begin();
        ok2.succeed(2);

        let report = BatchReport::from_statuses(&[ok, bad, ok2]);
        assert_eq!(report.total_units, 3);
        assert_eq!(report.succeeded_units, 2);
        assert_eq!(report.failed_units, 1);
        assert_eq!(report.generated_test_cases, 6);
        assert_eq!(report.failures[0].name, "b.pdf");
        assert!(report.is_partial());
    }

    #[test]
    fn test_status_wire_format() {
        let mut status = BatchFileStatus::pending("reqs.pdf");
        status.begin();
        status.succeed(1);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "reqs.pdf", "status": "success", "generatedCount": 1})
        );
    }
}
