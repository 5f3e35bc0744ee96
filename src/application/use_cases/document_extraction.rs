use crate::domain::document::{DocumentFormat, UploadedFile};
use crate::domain::error::{AppError, Result};
use async_trait::async_trait;
use tracing::debug;

mod docx;
mod pdf;

/// Converts an uploaded document into plain text.
#[async_trait]
pub trait DocumentTextExtractor {
    async fn extract_text(&self, file: &UploadedFile) -> Result<String>;
}

/// PDF (`lopdf`) and DOCX (`docx-rs`) text extraction.
#[derive(Debug, Default, Clone)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_sync(&self, file: &UploadedFile) -> Result<String> {
        let format = file.format().ok_or_else(|| {
            AppError::Extraction(format!(
                "Unsupported file type for '{}'. Only PDF and DOCX documents are supported.",
                file.name
            ))
        })?;

        let text = match format {
            DocumentFormat::Pdf => self.parse_pdf(file)?,
            DocumentFormat::Docx => self.parse_docx(file)?,
        };

        debug!(file = %file.name, ?format, chars = text.len(), "Extracted document text");
        Ok(text)
    }
}

#[async_trait]
impl DocumentTextExtractor for DocumentExtractor {
    async fn extract_text(&self, file: &UploadedFile) -> Result<String> {
        let extractor = self.clone();
        let file = file.clone();
        let name = file.name.clone();

        tokio::task::spawn_blocking(move || extractor.extract_sync(&file))
            .await
            .map_err(|e| {
                AppError::Extraction(format!("Text extraction for '{}' was aborted: {}", name, e))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{DOCX_MIME, PDF_MIME};

    #[tokio::test]
    async fn test_unsupported_type_names_the_file() {
        let file = UploadedFile::new("notes.txt", Some("text/plain".into()), b"hello".to_vec());
        let err = DocumentExtractor::new().extract_text(&file).await.unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
        assert!(err.to_string().contains("'notes.txt'"));
        assert!(err.to_string().contains("Unsupported file type"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_async_extraction_on_current_thread_runtime() {
        let file = UploadedFile::new("broken.docx", Some(DOCX_MIME.into()), b"PK garbage".to_vec());
        let err = DocumentExtractor::new().extract_text(&file).await.unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
        assert!(err.to_string().contains("broken.docx"));
    }

    #[test]
    fn test_corrupt_pdf_is_extraction_error() {
        let file = UploadedFile::new("broken.pdf", Some(PDF_MIME.into()), b"not a pdf".to_vec());
        let err = DocumentExtractor::new().extract_sync(&file).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
        assert!(err.to_string().contains("broken.pdf"));
    }

    #[test]
    fn test_corrupt_docx_is_extraction_error() {
        let file = UploadedFile::new("broken.docx", Some(DOCX_MIME.into()), b"PK nope".to_vec());
        let err = DocumentExtractor::new().extract_sync(&file).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_docx_text_and_tables() {
        use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("ID"))),
            TableCell::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Login works"))),
        ])]);
        let mut buffer = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(
                Paragraph::new().add_run(Run::new().add_text("The system shall allow login.")),
            )
            .add_table(table)
            .build()
            .pack(&mut buffer)
            .unwrap();

        let file = UploadedFile::new("reqs.docx", None, buffer.into_inner());
        let text = DocumentExtractor::new().extract_text(&file).await.unwrap();
        assert!(text.contains("The system shall allow login."));
        assert!(text.contains("ID | Login works"));
    }
}
