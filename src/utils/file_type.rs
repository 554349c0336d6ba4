/*!
 * File Type Routing
 *
 * Decides which extraction backend an upload goes to, based only on the
 * extension of the filename the client sent.
 */

use std::fmt;

use crate::error::ExtractionError;

/// Extraction backend selected for an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionKind {
    /// Text layer extraction from a PDF
    Pdf,
    /// OCR over a raster image
    Image,
}

impl fmt::Display for ExtractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionKind::Pdf => write!(f, "pdf"),
            ExtractionKind::Image => write!(f, "image"),
        }
    }
}

const PDF_EXTENSIONS: &[&str] = &[".pdf"];
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// Pick the backend for an extension such as `.PDF` or `.png`.
pub fn classify_extension(extension: &str) -> Result<ExtractionKind, ExtractionError> {
    let extension = extension.to_lowercase();

    if PDF_EXTENSIONS.contains(&extension.as_str()) {
        Ok(ExtractionKind::Pdf)
    } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Ok(ExtractionKind::Image)
    } else {
        Err(ExtractionError::UnsupportedFileType { extension })
    }
}

/// Pick the backend for a client-supplied filename.
pub fn classify_filename(filename: &str) -> Result<ExtractionKind, ExtractionError> {
    classify_extension(&extract_extension(filename))
}

pub fn is_supported_filename(filename: &str) -> bool {
    classify_filename(filename).is_ok()
}

/// Extract file extension from filename (lowercased, with the leading dot).
///
/// Only the final path component is considered, and a leading dot alone
/// (`.bashrc`) does not count as an extension.
pub fn extract_extension(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    match basename.rfind('.') {
        Some(pos) if pos > 0 => basename[pos..].to_lowercase(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_routes_to_pdf_extractor() {
        assert_eq!(classify_filename("document.pdf").unwrap(), ExtractionKind::Pdf);
        assert_eq!(classify_filename("SCAN.PDF").unwrap(), ExtractionKind::Pdf);
    }

    #[test]
    fn test_images_route_to_ocr() {
        assert_eq!(classify_filename("photo.jpg").unwrap(), ExtractionKind::Image);
        assert_eq!(classify_filename("photo.JPEG").unwrap(), ExtractionKind::Image);
        assert_eq!(classify_filename("scan.png").unwrap(), ExtractionKind::Image);
    }

    #[test]
    fn test_extract_extension() {
        assert_eq!(extract_extension("report.Final.PDF"), ".pdf");
        assert_eq!(extract_extension("README"), "");
        assert_eq!(extract_extension(".png"), "");
        assert_eq!(extract_extension("dir.v2/archive"), "");
        assert_eq!(extract_extension("C:\\scans\\page.Png"), ".png");
    }

    #[test]
    fn test_unsupported_keeps_lowercased_extension() {
        match classify_filename("notes.TXT") {
            Err(ExtractionError::UnsupportedFileType { extension }) => assert_eq!(extension, ".txt"),
            other => panic!("expected UnsupportedFileType, got {:?}", other),
        }
    }
}
