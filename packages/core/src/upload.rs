// ABOUTME: Binary document uploads for project creation
// ABOUTME: Reads a file, checks the extension against the accepted types and keeps the bytes

use bytes::Bytes;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

use crate::constants::ACCEPTED_DOCUMENT_EXTENSIONS;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported document type: {0}. Accepted: .pdf, .png, .jpg, .jpeg")]
    UnsupportedType(String),

    #[error("Document is empty: {0}")]
    Empty(String),

    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

/// A file to transmit as a multipart part
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl DocumentUpload {
    /// Build an upload from in-memory bytes, deriving the content type from the name
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name)?;
        Ok(Self {
            file_name,
            content_type: content_type.to_string(),
            bytes: bytes.into(),
        })
    }

    /// Read an upload from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        // Reject unsupported types before reading the file
        content_type_for(&file_name)?;

        let bytes = fs::read(path).await?;
        if bytes.is_empty() {
            return Err(UploadError::Empty(file_name));
        }
        Self::new(file_name, bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Content type for an accepted document name
pub fn content_type_for(file_name: &str) -> Result<mime::Mime, UploadError> {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if !ACCEPTED_DOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedType(file_name.to_string()));
    }

    Ok(match extension.as_str() {
        "pdf" => mime::APPLICATION_PDF,
        "png" => mime::IMAGE_PNG,
        _ => mime::IMAGE_JPEG,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("brd.pdf", "application/pdf")]
    #[case("scan.PNG", "image/png")]
    #[case("photo.jpeg", "image/jpeg")]
    #[case("photo.jpg", "image/jpeg")]
    fn test_content_type_for(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(content_type_for(name).unwrap().as_ref(), expected);
    }

    #[rstest]
    #[case("notes.docx")]
    #[case("README")]
    fn test_unsupported_types(#[case] name: &str) {
        assert!(matches!(
            content_type_for(name),
            Err(UploadError::UnsupportedType(_))
        ));
    }

    #[tokio::test]
    async fn test_from_path_reads_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.pdf");
        std::fs::write(&path, b"%PDF-1.4 test").unwrap();

        let upload = DocumentUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.file_name, "requirements.pdf");
        assert_eq!(upload.content_type, "application/pdf");
        assert_eq!(upload.len(), 13);
    }

    #[tokio::test]
    async fn test_from_path_rejects_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.pdf");
        std::fs::write(&path, b"").unwrap();

        assert!(matches!(
            DocumentUpload::from_path(&path).await,
            Err(UploadError::Empty(_))
        ));
    }
}
