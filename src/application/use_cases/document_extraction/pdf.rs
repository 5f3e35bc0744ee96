use super::DocumentExtractor;
use crate::domain::document::UploadedFile;
use crate::domain::error::{AppError, Result};
use lopdf::Document;
use tracing::warn;

impl DocumentExtractor {
    /// Text per page, joined by blank lines. A PDF without a text layer
    /// yields an empty string rather than an error.
    pub(super) fn parse_pdf(&self, file: &UploadedFile) -> Result<String> {
        let document = Document::load_mem(&file.bytes).map_err(|e| {
            AppError::Extraction(format!("Failed to read PDF '{}': {}", file.name, e))
        })?;

        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        let mut pages = Vec::with_capacity(page_numbers.len());

        for page_number in page_numbers {
            match document.extract_text(&[page_number]) {
                Ok(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        pages.push(trimmed.to_string());
                    }
                }
                Err(e) => {
                    warn!(file = %file.name, page = page_number, error = %e, "Skipping unreadable PDF page");
                }
            }
        }

        Ok(pages.join("\n\n"))
    }
}
