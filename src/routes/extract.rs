use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::{
    error::ExtractionError,
    extraction::ExtractionResult,
    storage::{local::LocalStorageBackend, TempUpload},
    utils::file_type::{classify_extension, extract_extension, ExtractionKind},
    AppState,
};

/// Name of the multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/extract-text", post(extract_text))
}

/// Receive one uploaded file, extract its text, and delete it again.
pub async fn extract_text(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionResult>, ExtractionError> {
    let multipart = multipart.map_err(|rejection| {
        debug!("Request is not a multipart upload: {}", rejection);
        ExtractionError::NoFileUploaded
    })?;

    let upload = receive_upload(&state.storage, multipart).await?;
    info!(
        original_filename = %upload.original_filename(),
        extension = %upload.extension(),
        path = %upload.path().display(),
        "Received file"
    );

    let result = dispatch(&state, &upload).await;
    upload.cleanup().await;

    let text = result?;
    Ok(Json(ExtractionResult { text }))
}

/// Stream the `file` field to temporary storage.
///
/// Fields with other names are skipped. A `file` field without a filename is
/// treated as "nothing selected", the way browsers submit an empty file input.
async fn receive_upload(
    storage: &LocalStorageBackend,
    mut multipart: Multipart,
) -> Result<TempUpload, ExtractionError> {
    let mut upload: Option<TempUpload> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        if upload.is_some() {
            return Err(ExtractionError::MultipleFiles);
        }

        // Reject before anything touches the disk; the extension becomes part
        // of the stored filename.
        classify_extension(&extract_extension(&filename))?;

        let mut writer = storage.begin_upload(&filename).await.map_err(storage_error)?;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            writer.write_chunk(&chunk).await.map_err(storage_error)?;
        }
        upload = Some(writer.finish().await.map_err(storage_error)?);
    }

    upload.ok_or(ExtractionError::NoFileUploaded)
}

/// Route the stored upload to the backend its extension calls for.
async fn dispatch(state: &AppState, upload: &TempUpload) -> Result<String, ExtractionError> {
    let kind = classify_extension(upload.extension())?;
    let extractor = match kind {
        ExtractionKind::Pdf => &state.pdf_extractor,
        ExtractionKind::Image => &state.ocr_extractor,
    };

    let timeout = state.config.extraction_timeout();
    let started = Instant::now();
    debug!(kind = %kind, extractor = extractor.name(), "Dispatching upload");

    match tokio::time::timeout(timeout, extractor.extract(upload.path())).await {
        Ok(Ok(text)) => {
            info!(
                kind = %kind,
                extractor = extractor.name(),
                chars = text.chars().count(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Extracted text"
            );
            Ok(text)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => {
            error!(
                kind = %kind,
                extractor = extractor.name(),
                timeout_secs = timeout.as_secs(),
                "Extraction timed out"
            );
            Err(timeout_error(kind, timeout))
        }
    }
}

fn timeout_error(kind: ExtractionKind, timeout: Duration) -> ExtractionError {
    let details = format!("timed out after {}s", timeout.as_secs());
    match kind {
        ExtractionKind::Pdf => ExtractionError::PdfParseFailed { details },
        ExtractionKind::Image => ExtractionError::OcrFailed { details },
    }
}

fn multipart_error(e: MultipartError) -> ExtractionError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ExtractionError::FileTooLarge { details: e.body_text() }
    } else {
        ExtractionError::InvalidMultipart { details: e.body_text() }
    }
}

fn storage_error(e: anyhow::Error) -> ExtractionError {
    ExtractionError::StorageFailed { details: e.to_string() }
}
