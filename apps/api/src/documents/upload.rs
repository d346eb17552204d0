//! Turns an uploaded resume file into plain text.
//!
//! The bytes are staged in a temporary file named with the validated extension;
//! the file is removed as soon as extraction returns, on success or failure.

use std::io::Write;

use anyhow::Context;
use bytes::Bytes;
use tracing::info;

use crate::config::Config;
use crate::documents::extract::{extract_text, ExtractError, ExtractedText, FileKind};
use crate::errors::AppError;
use crate::validation::{validate_upload_name, validate_upload_size};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied name; only its extension is trusted.
    pub file_name: String,
    pub data: Bytes,
}

pub async fn extract_uploaded_resume(
    upload: UploadedFile,
    config: &Config,
) -> Result<String, AppError> {
    let kind = validate_upload_name(&upload.file_name, &config.allowed_extensions)?;
    validate_upload_size(upload.data.len(), config.max_file_size)?;

    let size = upload.data.len();
    let extracted = tokio::task::spawn_blocking(move || extract_staged(&upload.data, kind))
        .await
        .context("resume extraction task failed")??;

    info!(
        "Extracted {} chars from {} upload ({size} bytes)",
        extracted.text.chars().count(),
        extracted.kind.extension()
    );

    if extracted.text.is_empty() {
        return Err(AppError::Validation(
            "Could not extract any text from the uploaded resume".to_string(),
        ));
    }

    Ok(extracted.text)
}

fn extract_staged(data: &[u8], kind: FileKind) -> Result<ExtractedText, ExtractError> {
    let mut staged = tempfile::Builder::new()
        .prefix("resume_")
        .suffix(&format!(".{}", kind.extension()))
        .tempfile()?;
    staged.write_all(data)?;
    staged.flush()?;

    extract_text(staged.path())
}
