use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Every way a text extraction request can fail.
///
/// `details` carries the underlying cause for the server log. It is never
/// part of the response body.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Unsupported file type: {extension:?}")]
    UnsupportedFileType { extension: String },

    #[error("Failed to read PDF: {details}")]
    PdfReadFailed { details: String },

    #[error("Failed to parse PDF: {details}")]
    PdfParseFailed { details: String },

    #[error("OCR failed: {details}")]
    OcrFailed { details: String },

    #[error("Upload exceeds the size limit: {details}")]
    FileTooLarge { details: String },

    #[error("Malformed multipart request: {details}")]
    InvalidMultipart { details: String },

    #[error("More than one file uploaded")]
    MultipleFiles,

    #[error("Failed to store upload: {details}")]
    StorageFailed { details: String },
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl ExtractionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractionError::NoFileUploaded
            | ExtractionError::UnsupportedFileType { .. }
            | ExtractionError::InvalidMultipart { .. }
            | ExtractionError::MultipleFiles => StatusCode::BAD_REQUEST,
            ExtractionError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractionError::PdfReadFailed { .. }
            | ExtractionError::PdfParseFailed { .. }
            | ExtractionError::OcrFailed { .. }
            | ExtractionError::StorageFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            ExtractionError::NoFileUploaded => "No file uploaded",
            ExtractionError::UnsupportedFileType { .. } => "Unsupported file type",
            ExtractionError::PdfReadFailed { .. } | ExtractionError::PdfParseFailed { .. } => {
                "Error processing PDF"
            }
            ExtractionError::OcrFailed { .. } => "Error processing image",
            ExtractionError::FileTooLarge { .. } => "File too large",
            ExtractionError::InvalidMultipart { .. } => "Invalid multipart request",
            ExtractionError::MultipleFiles => "Only one file may be uploaded",
            ExtractionError::StorageFailed { .. } => "Error storing upload",
        }
    }
}

impl IntoResponse for ExtractionError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Text extraction request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Text extraction request rejected");
        }

        (
            status,
            Json(ErrorBody {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        assert_eq!(ExtractionError::NoFileUploaded.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ExtractionError::UnsupportedFileType { extension: ".txt".to_string() }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ExtractionError::MultipleFiles.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_both_pdf_failures_share_one_public_message() {
        let read = ExtractionError::PdfReadFailed { details: "permission denied".to_string() };
        let parse = ExtractionError::PdfParseFailed { details: "bad xref".to_string() };
        assert_eq!(read.public_message(), "Error processing PDF");
        assert_eq!(parse.public_message(), "Error processing PDF");
        assert_eq!(read.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_response_body_hides_details() {
        let err = ExtractionError::OcrFailed { details: "leptonica: cannot open /secret/path".to_string() };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Error processing image" }));
        assert!(!String::from_utf8_lossy(&body).contains("/secret/path"));
    }
}
