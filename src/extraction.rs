//! Text extraction backends
//!
//! Both the PDF text-layer extractor and the OCR engine sit behind
//! [`TextExtractor`], so the request pipeline does not care which one it
//! is talking to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ExtractionError;

/// Successful extraction, serialized as the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub text: String,
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Short identifier used in logs (e.g. "pdf", "tesseract")
    fn name(&self) -> &'static str;

    /// Extract plain text from the file at `path`.
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}
