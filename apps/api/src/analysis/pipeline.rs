//! Analysis Pipeline — runs the four steps for one (resume, job description) pair.
//!
//! Flow: job analysis → gap analysis → ATS scan → optimization.
//!
//! Steps run strictly in order; a run never has two provider calls in flight.
//! The first failing step aborts the run and nothing partial is returned.
//! Retries live in `LlmClient` only; the pipeline never re-runs a step.

use tracing::info;
use uuid::Uuid;

use crate::analysis::ats_scanner::AtsScanner;
use crate::analysis::gap_analyzer::GapAnalyzer;
use crate::analysis::job_analyzer::JobAnalyzer;
use crate::analysis::optimizer::ResumeOptimizer;
use crate::analysis::AnalysisError;
use crate::llm_client::LlmClient;
use crate::models::analysis::AnalysisRun;

/// Holds one instance of each step service. Built once at startup and shared
/// through `AppState`; runs never share any mutable state.
#[derive(Clone)]
pub struct AnalysisPipeline {
    job_analyzer: JobAnalyzer,
    gap_analyzer: GapAnalyzer,
    ats_scanner: AtsScanner,
    optimizer: ResumeOptimizer,
}

impl AnalysisPipeline {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            job_analyzer: JobAnalyzer::new(llm.clone()),
            gap_analyzer: GapAnalyzer::new(llm.clone()),
            ats_scanner: AtsScanner::new(llm.clone()),
            optimizer: ResumeOptimizer::new(llm),
        }
    }

    /// Runs all four steps and returns the combined result.
    pub async fn run(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisRun, AnalysisError> {
        let id = Uuid::new_v4();

        info!("[{id}] Step 1: Analyzing job description...");
        let job_analysis = self.job_analyzer.analyze(job_description).await?;

        info!("[{id}] Step 2: Analyzing resume gaps...");
        let gap_analysis = self.gap_analyzer.analyze(resume_text, &job_analysis).await?;

        info!("[{id}] Step 3: Scanning ATS compatibility...");
        let ats_scan = self.ats_scanner.scan(resume_text).await?;

        info!("[{id}] Step 4: Optimizing resume...");
        let optimized_resume = self
            .optimizer
            .optimize(resume_text, &job_analysis, &gap_analysis, &ats_scan)
            .await?;

        info!(
            "[{id}] Analysis complete: match_score={}, ats_score={}",
            gap_analysis.match_score, ats_scan.ats_score
        );

        Ok(AnalysisRun {
            id,
            job_analysis,
            gap_analysis,
            ats_scan,
            optimized_resume,
        })
    }
}
