//! Temporary storage for in-flight uploads
//!
//! An upload lives on disk only while its request is being handled.
//! [`TempUpload`] owns the file and removes it when the request is done,
//! whichever way it ends.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

pub mod local;

/// A stored upload owned by a single request.
///
/// Call [`TempUpload::cleanup`] on the normal path. If the value is dropped
/// without it (early return, panic, cancelled request), `Drop` removes the
/// file synchronously instead.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    original_filename: String,
    extension: String,
    released: bool,
}

impl TempUpload {
    pub(crate) fn new(path: PathBuf, original_filename: String, extension: String) -> Self {
        Self {
            path,
            original_filename,
            extension,
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    /// Lowercased, with the leading dot; empty when the filename had none
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Delete the stored file. Failures are logged, never returned.
    pub async fn cleanup(mut self) {
        self.released = true;
        remove_temp_file(&self.path).await;
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Deleted temporary upload on drop: {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to delete temporary upload {}: {}", self.path.display(), e),
        }
    }
}

/// Remove a temporary file, treating "already gone" as success.
///
/// Returns whether a file was actually deleted.
pub async fn remove_temp_file(path: &Path) -> bool {
    match fs::remove_file(path).await {
        Ok(()) => {
            debug!("Deleted temporary upload: {}", path.display());
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Temporary upload already deleted: {}", path.display());
            false
        }
        Err(e) => {
            warn!("Failed to delete temporary upload {}: {}", path.display(), e);
            false
        }
    }
}
