//! Step 3 — rates how well an ATS can parse the resume. Does not look at the job.

use tracing::debug;

use crate::analysis::prompts::ATS_SCAN_PROMPT_TEMPLATE;
use crate::analysis::{AnalysisError, PipelineStep};
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, RECRUITER_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::analysis::AtsScan;

#[derive(Clone)]
pub struct AtsScanner {
    llm: LlmClient,
}

impl AtsScanner {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    pub async fn scan(&self, resume_text: &str) -> Result<AtsScan, AnalysisError> {
        let prompt = ATS_SCAN_PROMPT_TEMPLATE
            .replace("{json_only}", JSON_ONLY_INSTRUCTION)
            .replace("{resume_text}", resume_text);

        let scan: AtsScan = self
            .llm
            .send_json(&prompt, Some(RECRUITER_SYSTEM))
            .await
            .map_err(|e| AnalysisError::new(PipelineStep::AtsScan, e))?;

        debug!(
            "ATS scan: score={}, {} recommendations",
            scan.ats_score,
            scan.recommendations.len()
        );

        Ok(scan)
    }
}
