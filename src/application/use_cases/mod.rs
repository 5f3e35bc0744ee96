pub mod alm_submission;
pub mod document_extraction;
pub mod generation;
pub mod materializer;
pub mod prompt_builder;
