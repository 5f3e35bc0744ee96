pub mod use_cases;

pub use use_cases::alm_submission::AlmSubmissionUseCase;
pub use use_cases::document_extraction::DocumentExtractor;
pub use use_cases::generation::{BatchRequest, GenerationOrchestrator, ProgressSender};
