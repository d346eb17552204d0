//! Axum route handler for the Analysis API.

use std::time::Duration;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::documents::upload::{extract_uploaded_resume, UploadedFile};
use crate::errors::AppError;
use crate::models::analysis::{AnalysisRun, AtsScan, GapAnalysis, JobAnalysis, OptimizedResume};
use crate::state::AppState;
use crate::validation::{validate_job_description, validate_resume_text};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Fields of the `multipart/form-data` analyze request. Unknown parts are ignored.
#[derive(Debug, Default)]
pub struct AnalyzeForm {
    pub job_description: Option<String>,
    pub resume_text: Option<String>,
    pub resume_file: Option<UploadedFile>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResults {
    pub step1_job_analysis: JobAnalysis,
    pub step2_gap_analysis: GapAnalysis,
    pub step3_ats_scan: AtsScan,
    pub step4_optimized_resume: OptimizedResume,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis_id: Uuid,
    pub results: AnalysisResults,
}

impl From<AnalysisRun> for AnalyzeResponse {
    fn from(run: AnalysisRun) -> Self {
        AnalyzeResponse {
            success: true,
            analysis_id: run.id,
            results: AnalysisResults {
                step1_job_analysis: run.job_analysis,
                step2_gap_analysis: run.gap_analysis,
                step3_ats_scan: run.ats_scan,
                step4_optimized_resume: run.optimized_resume,
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

fn invalid_form(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid form data: {e}"))
}

pub async fn read_analyze_form(mut multipart: Multipart) -> Result<AnalyzeForm, AppError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => {
                form.job_description = Some(field.text().await.map_err(invalid_form)?);
            }
            "resume_text" => {
                form.resume_text = Some(field.text().await.map_err(invalid_form)?);
            }
            "resume_file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(invalid_form)?;
                form.resume_file = Some(UploadedFile { file_name, data });
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/analyze
///
/// Runs the four-step pipeline for an uploaded resume file (or pasted resume
/// text) against a job description. A file part wins over pasted text.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_analyze_form(multipart).await?;

    let job_description = form.job_description.unwrap_or_default();
    validate_job_description(&job_description)?;

    let resume_text = match (form.resume_file, form.resume_text) {
        (Some(upload), _) => extract_uploaded_resume(upload, &state.config).await?,
        (None, Some(text)) => {
            validate_resume_text(&text)?;
            text
        }
        (None, None) => {
            return Err(AppError::Validation(
                "Either resume_file or resume_text is required".to_string(),
            ))
        }
    };

    let timeout_secs = state.config.pipeline_timeout_secs;
    let run = tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        state.pipeline.run(&resume_text, &job_description),
    )
    .await
    .map_err(|_| AppError::Timeout(timeout_secs))??;

    info!("[{}] Analysis complete!", run.id);

    Ok(Json(run.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_wraps_run_under_numbered_step_keys() {
        let run = AnalysisRun {
            id: Uuid::new_v4(),
            job_analysis: JobAnalysis::default(),
            gap_analysis: GapAnalysis {
                match_score: 64,
                ..Default::default()
            },
            ats_scan: AtsScan::default(),
            optimized_resume: OptimizedResume {
                formatted_text: "JANE DOE".to_string(),
                original_length: 10,
                optimized_length: 8,
            },
        };
        let id = run.id;

        let body = serde_json::to_value(AnalyzeResponse::from(run)).unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["analysis_id"], id.to_string());
        assert_eq!(body["results"]["step2_gap_analysis"]["match_score"], 64);
        assert_eq!(
            body["results"]["step4_optimized_resume"]["formatted_text"],
            "JANE DOE"
        );
        assert!(body["results"]["step1_job_analysis"]["required_skills"].is_array());
        assert!(body["results"]["step3_ats_scan"]["issues"]["formatting"].is_array());
    }
}
