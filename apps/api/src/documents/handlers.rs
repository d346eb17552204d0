//! Axum route handler for DOCX download.

use axum::{
    extract::rejection::JsonRejection,
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use crate::documents::docx_writer::render_document;
use crate::errors::AppError;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DEFAULT_CANDIDATE_NAME: &str = "Resume";

#[derive(Debug, Deserialize)]
pub struct GenerateDocxRequest {
    pub optimized_resume_text: Option<String>,
    pub candidate_name: Option<String>,
}

/// POST /api/generate-docx
///
/// Renders the optimized resume text as a `.docx` attachment.
pub async fn handle_generate_docx(
    payload: Result<Json<GenerateDocxRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) =
        payload.map_err(|_| AppError::Validation("No data provided".to_string()))?;

    let text = request
        .optimized_resume_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("optimized_resume_text is required".to_string()))?;
    let candidate_name = request
        .candidate_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CANDIDATE_NAME.to_string());

    let document = tokio::task::spawn_blocking(move || render_document(&text, &candidate_name))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let file_name = format!(
        "optimized_resume_{}.docx",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    info!("Generated {file_name} ({} bytes)", document.len());

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        Bytes::from(document),
    ))
}
