//! Step 1 — extracts required/preferred skills, responsibilities and ATS keywords from a job description.

use tracing::debug;

use crate::analysis::prompts::JOB_ANALYSIS_PROMPT_TEMPLATE;
use crate::analysis::{AnalysisError, PipelineStep};
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, RECRUITER_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::analysis::JobAnalysis;

#[derive(Clone)]
pub struct JobAnalyzer {
    llm: LlmClient,
}

impl JobAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    pub async fn analyze(&self, job_description: &str) -> Result<JobAnalysis, AnalysisError> {
        let prompt = JOB_ANALYSIS_PROMPT_TEMPLATE
            .replace("{json_only}", JSON_ONLY_INSTRUCTION)
            .replace("{job_description}", job_description);

        let analysis: JobAnalysis = self
            .llm
            .send_json(&prompt, Some(RECRUITER_SYSTEM))
            .await
            .map_err(|e| AnalysisError::new(PipelineStep::JobAnalysis, e))?;

        debug!(
            "Job analysis: {} required, {} preferred, {} ATS keywords",
            analysis.required_skills.len(),
            analysis.preferred_skills.len(),
            analysis.ats_keywords.len()
        );

        Ok(analysis)
    }
}
