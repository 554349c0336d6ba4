pub mod error;
pub mod health;

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::ExtractionError;
use crate::extraction::TextExtractor;
use crate::ocr::error::OcrError;
use crate::ocr::health::OcrHealthChecker;

#[cfg(feature = "ocr")]
use tesseract::Tesseract;

/// Stages reported while Tesseract works on an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrProgress {
    Initializing,
    LoadingImage,
    Recognizing,
    Completed,
}

impl fmt::Display for OcrProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcrProgress::Initializing => write!(f, "initializing tesseract api"),
            OcrProgress::LoadingImage => write!(f, "loading image"),
            OcrProgress::Recognizing => write!(f, "recognizing text"),
            OcrProgress::Completed => write!(f, "completed"),
        }
    }
}

/// Fire-and-forget hook for progress events. Called from the blocking pool.
pub type ProgressObserver = Arc<dyn Fn(&Path, OcrProgress) + Send + Sync>;

fn log_progress(path: &Path, progress: OcrProgress) {
    debug!(path = %path.display(), status = %progress, "OCR progress");
}

/// Configuration for the OCR service
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Tesseract language hint, e.g. `eng` or `eng+deu`
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }
}

pub struct OcrService {
    health_checker: OcrHealthChecker,
    language: String,
    observer: ProgressObserver,
}

impl OcrService {
    pub fn new() -> Self {
        Self::new_with_config(OcrConfig::default())
    }

    /// Create OCR service with configuration
    pub fn new_with_config(config: OcrConfig) -> Self {
        Self {
            health_checker: OcrHealthChecker::new(),
            language: config.language,
            observer: Arc::new(log_progress),
        }
    }

    /// Replace the default tracing observer.
    pub fn with_progress_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub async fn extract_text_from_image(&self, file_path: &Path) -> Result<String, OcrError> {
        self.extract_text_from_image_with_lang(file_path, &self.language).await
    }

    pub async fn extract_text_from_image_with_lang(&self, file_path: &Path, lang: &str) -> Result<String, OcrError> {
        self.health_checker.validate_language_combination(lang)?;

        let path = file_path.to_path_buf();
        let lang = lang.to_string();
        let observer = self.observer.clone();

        tokio::task::spawn_blocking(move || run_tesseract(&path, &lang, observer.as_ref()))
            .await
            .map_err(|e| OcrError::TaskAborted { details: e.to_string() })?
    }
}

impl Default for OcrService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "ocr")]
fn run_tesseract(
    path: &Path,
    lang: &str,
    observer: &(dyn Fn(&Path, OcrProgress) + Send + Sync),
) -> Result<String, OcrError> {
    let path_str = path.to_str().ok_or_else(|| OcrError::ImageLoadFailed {
        details: format!("path is not valid UTF-8: {}", path.display()),
    })?;

    observer(path, OcrProgress::Initializing);
    let tesseract = Tesseract::new(None, Some(lang))
        .map_err(|e| OcrError::InitializationFailed { details: e.to_string() })?;

    observer(path, OcrProgress::LoadingImage);
    let tesseract = tesseract
        .set_image(path_str)
        .map_err(|e| OcrError::ImageLoadFailed { details: e.to_string() })?;

    observer(path, OcrProgress::Recognizing);
    let mut tesseract = tesseract
        .recognize()
        .map_err(|e| OcrError::RecognitionFailed { details: e.to_string() })?;
    let text = tesseract
        .get_text()
        .map_err(|e| OcrError::RecognitionFailed { details: e.to_string() })?;

    observer(path, OcrProgress::Completed);
    Ok(text.trim().to_string())
}

#[cfg(not(feature = "ocr"))]
fn run_tesseract(
    _path: &Path,
    _lang: &str,
    _observer: &(dyn Fn(&Path, OcrProgress) + Send + Sync),
) -> Result<String, OcrError> {
    Err(OcrError::TesseractNotInstalled)
}

#[async_trait]
impl TextExtractor for OcrService {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        self.extract_text_from_image(path).await.map_err(|e| {
            error!(path = %path.display(), language = %self.language, "OCR error: {}", e);
            ExtractionError::OcrFailed { details: e.to_string() }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_invalid_language_rejected_before_engine_runs() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = calls.clone();
        let service = OcrService::new().with_progress_observer(Arc::new(move |_: &Path, p: OcrProgress| {
            recorded.lock().unwrap().push(p);
        }));

        let result = service
            .extract_text_from_image_with_lang(Path::new("scan.png"), "not a language")
            .await;

        assert!(matches!(result, Err(OcrError::InvalidLanguage { .. })));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_image_maps_to_ocr_failed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"plain text pretending to be a png").unwrap();

        let result = OcrService::new().extract(&path).await;
        assert!(matches!(result, Err(ExtractionError::OcrFailed { .. })));
    }

    #[test]
    fn test_default_language_is_english() {
        assert_eq!(OcrService::new().language(), "eng");
    }
}
