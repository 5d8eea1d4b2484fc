//! Local preview resource for a selected file
//!
//! A preview is a temporary on-disk copy of the image that a viewer can open.
//! The copy is deleted when the handle is dropped, so every exit path
//! (clear, replace, submit, controller teardown) releases it.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

use crate::models::CandidateFile;

/// Owned preview of a selected image
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
}

impl PreviewHandle {
    /// Write a preview copy of `candidate` to the temp directory
    pub fn create(candidate: &CandidateFile) -> std::io::Result<Self> {
        let suffix = Path::new(candidate.name())
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("drscan-preview-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(candidate.content())?;
        file.flush()?;

        tracing::debug!(
            file_name = %candidate.name(),
            preview = %file.path().display(),
            "Preview created"
        );

        Ok(Self { file })
    }

    /// [`create`](Self::create) on the blocking thread pool
    pub async fn create_blocking(candidate: Arc<CandidateFile>) -> std::io::Result<Self> {
        tokio::task::spawn_blocking(move || Self::create(&candidate))
            .await
            .map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Preview task failed: {}", e),
                )
            })?
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        tracing::debug!(preview = %self.file.path().display(), "Preview released");
    }
}
