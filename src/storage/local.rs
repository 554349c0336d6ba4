//! Local filesystem staging area for uploads

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};
use uuid::Uuid;

use super::TempUpload;
use crate::utils::file_type::extract_extension;

/// Local filesystem storage backend
pub struct LocalStorageBackend {
    upload_path: String,
}

impl LocalStorageBackend {
    /// Create a new local storage backend
    pub fn new(upload_path: String) -> Self {
        Self { upload_path }
    }

    /// Create the upload directory (recursively) if it does not exist yet.
    pub async fn initialize(&self) -> Result<()> {
        let base_path = Path::new(&self.upload_path);
        if let Err(e) = fs::create_dir_all(base_path).await {
            error!("Failed to create upload directory {:?}: {}", base_path, e);
            return Err(anyhow!("Failed to create upload directory {}: {}", self.upload_path, e));
        }
        info!("Ensured upload directory exists: {:?}", base_path);
        Ok(())
    }

    /// Stored name for an upload: a fresh UUID plus the original extension.
    fn generate_filename(original_filename: &str) -> (String, String) {
        let extension = extract_extension(original_filename);
        (format!("{}{}", Uuid::new_v4(), extension), extension)
    }

    /// Open a new file in the upload directory for an incoming upload.
    pub async fn begin_upload(&self, original_filename: &str) -> Result<UploadWriter> {
        let upload_dir = PathBuf::from(&self.upload_path);
        fs::create_dir_all(&upload_dir).await?;

        let (stored_name, extension) = Self::generate_filename(original_filename);
        let file_path = upload_dir.join(stored_name);

        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .await
            .map_err(|e| anyhow!("Failed to create {}: {}", file_path.display(), e))?;

        Ok(UploadWriter {
            file,
            upload: TempUpload::new(file_path, original_filename.to_string(), extension),
            bytes_written: 0,
        })
    }
}

/// Receives the bytes of one upload.
///
/// Dropping the writer before [`UploadWriter::finish`] deletes whatever was
/// written so far.
pub struct UploadWriter {
    file: fs::File,
    upload: TempUpload,
    bytes_written: u64,
}

impl UploadWriter {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn path(&self) -> &Path {
        self.upload.path()
    }

    pub async fn finish(self) -> Result<TempUpload> {
        let UploadWriter {
            mut file,
            upload,
            bytes_written,
        } = self;

        file.flush().await?;
        drop(file);

        info!(
            path = %upload.path().display(),
            original_filename = %upload.original_filename(),
            size = bytes_written,
            "Stored upload"
        );
        Ok(upload)
    }
}
