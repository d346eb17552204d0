//! Step 4 — rewrites the resume using everything the first three steps learned.
//!
//! Unlike the other steps the answer is free-form resume text, so this uses
//! `send` rather than `send_json`, with a larger output budget.

use tracing::debug;

use crate::analysis::prompts::OPTIMIZATION_PROMPT_TEMPLATE;
use crate::analysis::{AnalysisError, PipelineStep};
use crate::llm_client::prompts::RECRUITER_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::analysis::{AtsScan, GapAnalysis, JobAnalysis, OptimizedResume};

/// A complete rewritten resume needs more room than a JSON answer.
const OPTIMIZATION_MAX_TOKENS: u32 = 8192;
/// Balances fidelity to the original with freedom to rephrase.
const OPTIMIZATION_TEMPERATURE: f32 = 0.5;

#[derive(Clone)]
pub struct ResumeOptimizer {
    llm: LlmClient,
}

impl ResumeOptimizer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    pub async fn optimize(
        &self,
        resume_text: &str,
        job_analysis: &JobAnalysis,
        gap_analysis: &GapAnalysis,
        ats_scan: &AtsScan,
    ) -> Result<OptimizedResume, AnalysisError> {
        let fail = |e: LlmError| AnalysisError::new(PipelineStep::Optimization, e);

        let job_analysis_json =
            serde_json::to_string_pretty(job_analysis).map_err(|e| fail(e.into()))?;
        let gap_analysis_json =
            serde_json::to_string_pretty(gap_analysis).map_err(|e| fail(e.into()))?;
        let ats_scan_json = serde_json::to_string_pretty(ats_scan).map_err(|e| fail(e.into()))?;

        let prompt = OPTIMIZATION_PROMPT_TEMPLATE
            .replace("{job_analysis}", &job_analysis_json)
            .replace("{gap_analysis}", &gap_analysis_json)
            .replace("{ats_scan}", &ats_scan_json)
            .replace("{resume_text}", resume_text);

        let raw = self
            .llm
            .send(
                &prompt,
                Some(RECRUITER_SYSTEM),
                OPTIMIZATION_MAX_TOKENS,
                OPTIMIZATION_TEMPERATURE,
            )
            .await
            .map_err(fail)?;

        let optimized = OptimizedResume {
            formatted_text: raw.trim().to_string(),
            original_length: resume_text.chars().count(),
            optimized_length: raw.chars().count(),
        };

        debug!(
            "Optimized resume: {} → {} chars",
            optimized.original_length, optimized.optimized_length
        );

        Ok(optimized)
    }
}
