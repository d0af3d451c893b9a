//! File Upload Boundary
//!
//! Reads a user-chosen file fully into memory and base64-encodes it for
//! transcription. The declared MIME type comes from the file extension; the
//! content itself is not inspected.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Extensions the upload trigger offers besides images
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];

/// Inline request payloads above this size are rejected by the model service
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// A file ready to be sent for transcription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    /// Base64 of the raw bytes
    #[serde(skip_serializing)]
    pub data: String,
    pub size: usize,
}

/// Guess the MIME type from the file name.
pub fn mime_type_for(path: &Path) -> String {
    mime_guess::from_path(path).first_or_octet_stream().to_string()
}

/// Whether the upload trigger would offer this file
pub fn is_accepted(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    DOCUMENT_EXTENSIONS.contains(&ext.as_str()) || mime_type_for(path).starts_with("image/")
}

/// Encode bytes that are already in memory.
pub fn encode_upload(file_name: &str, bytes: &[u8], mime_type: &str) -> AppResult<UploadedFile> {
    if bytes.is_empty() {
        return Err(AppError::upload(format!("{} is empty", file_name)));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::upload(format!(
            "{} is {} bytes, the limit is {}",
            file_name,
            bytes.len(),
            MAX_UPLOAD_BYTES
        )));
    }
    Ok(UploadedFile {
        file_name: file_name.to_string(),
        mime_type: mime_type.to_string(),
        data: BASE64.encode(bytes),
        size: bytes.len(),
    })
}

/// Read and encode a file from disk.
pub async fn read_upload(path: &Path) -> AppResult<UploadedFile> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::upload(format!("Invalid file path: {}", path.display())))?
        .to_string();

    if !is_accepted(path) {
        tracing::warn!(file = %file_name, "Uploading a file type the picker would not offer");
    }

    let bytes = tokio::fs::read(path).await?;
    let mime_type = mime_type_for(path);
    tracing::debug!(file = %file_name, mime = %mime_type, bytes = bytes.len(), "Read upload");
    encode_upload(&file_name, &bytes, &mime_type)
}
