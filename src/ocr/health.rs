use crate::ocr::error::OcrError;

/// Sanity checks run before handing a language hint to Tesseract.
#[derive(Debug, Default, Clone)]
pub struct OcrHealthChecker;

impl OcrHealthChecker {
    pub fn new() -> Self {
        Self
    }

    /// Accepts a single traineddata name (`eng`, `chi_sim`) or a
    /// `+`-joined combination (`eng+deu`).
    pub fn validate_language_combination(&self, lang: &str) -> Result<(), OcrError> {
        if lang.trim().is_empty() {
            return Err(OcrError::InvalidLanguage {
                lang: lang.to_string(),
                reason: "language must not be empty".to_string(),
            });
        }

        for code in lang.split('+') {
            if code.len() < 3 {
                return Err(OcrError::InvalidLanguage {
                    lang: lang.to_string(),
                    reason: format!("'{}' is too short", code),
                });
            }
            if !code.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
                return Err(OcrError::InvalidLanguage {
                    lang: lang.to_string(),
                    reason: format!("'{}' contains characters other than a-z and '_'", code),
                });
            }
        }

        Ok(())
    }
}
