use crate::domain::batch::BatchUnit;
use crate::domain::document::UploadedFile;
use crate::domain::error::{AppError, Result};

/// One unit per file in upload order; a single text unit only when there are
/// no files. With files present the requirement text is shared context, not a
/// unit of its own.
pub fn plan_units(requirement: &str, files: Vec<UploadedFile>) -> Result<Vec<BatchUnit>> {
    let has_text = !requirement.trim().is_empty();

    if files.is_empty() {
        if !has_text {
            return Err(AppError::Validation(
                "Enter a requirement or upload at least one document.".to_string(),
            ));
        }
        return Ok(vec![BatchUnit::Text]);
    }

    Ok(files.into_iter().map(BatchUnit::File).collect())
}
