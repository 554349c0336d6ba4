use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Tesseract is not available in this build. Rebuild with the `ocr` feature and install tesseract/leptonica.")]
    TesseractNotInstalled,

    #[error("Invalid OCR language specification '{lang}': {reason}")]
    InvalidLanguage { lang: String, reason: String },

    #[error("Failed to initialize Tesseract: {details}")]
    InitializationFailed { details: String },

    #[error("Failed to load image: {details}")]
    ImageLoadFailed { details: String },

    #[error("Failed to recognize text: {details}")]
    RecognitionFailed { details: String },

    #[error("OCR task aborted: {details}")]
    TaskAborted { details: String },
}
