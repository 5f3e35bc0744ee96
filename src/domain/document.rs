use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A document uploaded alongside (or instead of) the requirement text.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type,
            bytes,
        }
    }

    /// Declared MIME type first, file extension second.
    pub fn format(&self) -> Option<DocumentFormat> {
        let declared = self
            .mime_type
            .as_deref()
            .map(|mime| mime.trim().to_ascii_lowercase());
        match declared.as_deref() {
            Some(PDF_MIME) => return Some(DocumentFormat::Pdf),
            Some(DOCX_MIME) => return Some(DocumentFormat::Docx),
            _ => {}
        }

        let extension = Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => Some(DocumentFormat::Pdf),
            Some("docx") => Some(DocumentFormat::Docx),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}
