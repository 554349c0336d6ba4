/*!
 * Test Helpers and Utilities
 *
 * This module provides utilities for creating test configurations and app
 * state with sensible defaults, plus stand-in extractors so request tests do
 * not depend on Tesseract being installed. Tests can modify the returned
 * objects as needed.
 */

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    error::ExtractionError,
    extraction::TextExtractor,
    storage::local::LocalStorageBackend,
    AppState,
};

/// Creates a test configuration with sensible defaults
/// All fields are populated to avoid compilation errors when new fields are added
pub fn create_test_config(upload_path: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        upload_path: upload_path.to_string(),
        public_dir: "/tmp/doctext_test_public".to_string(),
        ocr_language: "eng".to_string(),
        max_file_size_mb: 5,
        extraction_timeout_seconds: 10,
        cors_enabled: true,
    }
}

/// Extractor that returns fixed text and counts how often it ran
pub struct FakeExtractor {
    text: String,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn returning(text: &str) -> Self {
        Self {
            text: text.to_string(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering, for timeout tests
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        // The upload must still be on disk while its extractor runs
        if !path.exists() {
            return Err(ExtractionError::OcrFailed {
                details: format!("{} missing during extraction", path.display()),
            });
        }
        Ok(self.text.clone())
    }
}

/// Extractor that always fails with the given error
pub struct FailingExtractor {
    make_error: fn() -> ExtractionError,
}

impl FailingExtractor {
    pub fn new(make_error: fn() -> ExtractionError) -> Self {
        Self { make_error }
    }
}

#[async_trait]
impl TextExtractor for FailingExtractor {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn extract(&self, _path: &Path) -> Result<String, ExtractionError> {
        Err((self.make_error)())
    }
}

/// Creates a test AppState with the given extractors
pub fn create_test_app_state_with_extractors(
    config: Config,
    pdf_extractor: Arc<dyn TextExtractor>,
    ocr_extractor: Arc<dyn TextExtractor>,
) -> Arc<AppState> {
    let storage = Arc::new(LocalStorageBackend::new(config.upload_path.clone()));
    Arc::new(AppState {
        config,
        storage,
        pdf_extractor,
        ocr_extractor,
    })
}

/// Creates a test AppState whose extractors return fixed text
pub fn create_test_app_state(upload_path: &str) -> Arc<AppState> {
    create_test_app_state_with_extractors(
        create_test_config(upload_path),
        Arc::new(FakeExtractor::returning("pdf text")),
        Arc::new(FakeExtractor::returning("image text")),
    )
}

/// Boundary used by [`multipart_request`]
pub const TEST_BOUNDARY: &str = "----doctext-test-boundary";

/// Builds a `POST /extract-text` request carrying the given parts.
///
/// Each part is `(field name, optional filename, content)`.
pub fn multipart_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", TEST_BOUNDARY).as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
            }
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", TEST_BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/extract-text")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", TEST_BOUNDARY),
        )
        .body(Body::from(body))
        .expect("valid multipart request")
}

/// Builds a request uploading a single file under the `file` field
pub fn upload_request(filename: &str, content: &[u8]) -> Request<Body> {
    multipart_request(&[("file", Some(filename), content)])
}

/// Number of entries in the upload directory (0 if it does not exist)
pub fn count_stored_uploads(upload_path: &str) -> usize {
    std::fs::read_dir(upload_path)
        .map(|entries| entries.count())
        .unwrap_or(0)
}
