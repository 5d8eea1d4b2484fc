//! Candidate image file selected by the user

use drscan_common::{Error, Result};
use std::path::Path;

/// MIME type used when the content cannot be sniffed
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// File selected or dropped for analysis
///
/// Not yet validated; see [`crate::services::ImageValidator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    mime_type: String,
    content: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Load a file from disk, sniffing its MIME type from magic bytes
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidInput(format!("Not a file path: {}", path.display())))?;

        if path.is_dir() {
            return Err(Error::InvalidInput(format!(
                "Expected a file, found a directory: {}",
                path.display()
            )));
        }

        let content = std::fs::read(path)?;
        let mime_type = sniff_mime_type(&content);

        tracing::debug!(
            file_name = %name,
            mime_type = %mime_type,
            size = content.len(),
            "Loaded candidate file"
        );

        Ok(Self::new(name, mime_type, content))
    }

    /// Original file name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

fn sniff_mime_type(content: &[u8]) -> String {
    infer::get(content)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string())
}
