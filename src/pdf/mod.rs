use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, error};

use crate::error::ExtractionError;
use crate::extraction::TextExtractor;

/// Extracts the embedded text layer of a PDF.
///
/// Scanned PDFs without a text layer come back empty; they are not sent
/// through OCR.
#[derive(Debug, Default, Clone)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    pub async fn extract_text_from_pdf(&self, file_path: &Path) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(file_path).await.map_err(|e| {
            error!(path = %file_path.display(), "Failed to read PDF: {}", e);
            ExtractionError::PdfReadFailed { details: e.to_string() }
        })?;

        debug!(path = %file_path.display(), size = bytes.len(), "Parsing PDF");

        // pdf-extract is synchronous and can panic on malformed input; a panic
        // surfaces here as a JoinError instead of taking down the worker.
        let parsed = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| {
            error!(path = %file_path.display(), "PDF parser aborted: {}", e);
            ExtractionError::PdfParseFailed { details: e.to_string() }
        })?;

        let text = parsed.map_err(|e| {
            error!(path = %file_path.display(), "PDF processing error: {}", e);
            ExtractionError::PdfParseFailed { details: e.to_string() }
        })?;

        Ok(clean_pdf_text(&text))
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        self.extract_text_from_pdf(path).await
    }
}

/// Trim every line, drop blank ones, and strip NUL/BOM artifacts.
pub fn clean_pdf_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim().replace(['\u{0}', '\u{FEFF}'], ""))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_pdf_text() {
        let dirty = "  Hello  \n\n\n  World  \n  ";
        assert_eq!(clean_pdf_text(dirty), "Hello\nWorld");
    }

    #[test]
    fn test_clean_pdf_text_strips_artifacts() {
        assert_eq!(clean_pdf_text("\u{FEFF}Hello\u{0} World"), "Hello World");
        assert_eq!(clean_pdf_text("\n\n   \n"), "");
    }

    #[tokio::test]
    async fn test_missing_file_is_read_failure() {
        let extractor = PdfExtractor::new();
        let result = extractor
            .extract_text_from_pdf(Path::new("/nonexistent/doctext/missing.pdf"))
            .await;
        assert!(matches!(result, Err(ExtractionError::PdfReadFailed { .. })));
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf at all").unwrap();

        let result = PdfExtractor::new().extract_text_from_pdf(&path).await;
        assert!(matches!(result, Err(ExtractionError::PdfParseFailed { .. })));
    }
}
