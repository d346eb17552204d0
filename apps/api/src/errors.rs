use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::documents::docx_writer::RenderError;
use crate::documents::extract::ExtractError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Extraction(#[from] ExtractError),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("Analysis timed out after {0}s")]
    Timeout(u64),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Extraction(e @ ExtractError::UnsupportedFormat(_)) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", e.to_string())
            }
            AppError::Extraction(e) => {
                tracing::warn!("Resume extraction failed: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_ERROR",
                    format!("Failed to parse resume: {e}"),
                )
            }
            AppError::Analysis(e) => {
                tracing::error!("Analysis error: {e}");
                let (status, code) = match &e.source {
                    LlmError::MissingApiKey => (StatusCode::SERVICE_UNAVAILABLE, "LLM_NOT_CONFIGURED"),
                    LlmError::ResponseFormat { .. }
                    | LlmError::Parse(_)
                    | LlmError::EmptyContent => (StatusCode::BAD_GATEWAY, "LLM_RESPONSE_ERROR"),
                    _ => (StatusCode::BAD_GATEWAY, "LLM_PROVIDER_ERROR"),
                };
                (status, code, self.to_string())
            }
            AppError::Render(e) => {
                tracing::error!("DOCX render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DOCX_ERROR",
                    "DOCX generation failed".to_string(),
                )
            }
            AppError::Timeout(_) => {
                tracing::error!("{self}");
                (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", self.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PipelineStep;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Extraction(ExtractError::UnsupportedFormat("exe".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Extraction(ExtractError::Pdf("bad xref".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Analysis(AnalysisError::new(
                    PipelineStep::JobAnalysis,
                    LlmError::MissingApiKey,
                )),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Analysis(AnalysisError::new(
                    PipelineStep::GapAnalysis,
                    LlmError::api(400, "bad"),
                )),
                StatusCode::BAD_GATEWAY,
            ),
            (AppError::Timeout(300), StatusCode::GATEWAY_TIMEOUT),
            (
                AppError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_analysis_error_message_names_failing_step() {
        let err = AppError::Analysis(AnalysisError::new(
            PipelineStep::GapAnalysis,
            LlmError::EmptyContent,
        ));
        assert_eq!(
            err.to_string(),
            "Analysis failed: Step 2 (gap analysis) failed: LLM returned empty content"
        );
    }
}
