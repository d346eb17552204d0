// Four-step resume analysis: job analysis → gap analysis → ATS scan → optimization.
// All LLM calls go through llm_client — no direct Anthropic calls here.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::llm_client::LlmError;

pub mod ats_scanner;
pub mod gap_analyzer;
pub mod handlers;
pub mod job_analyzer;
pub mod optimizer;
pub mod pipeline;
pub mod prompts;

/// The four pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    JobAnalysis,
    GapAnalysis,
    AtsScan,
    Optimization,
}

impl PipelineStep {
    pub fn number(self) -> u8 {
        match self {
            PipelineStep::JobAnalysis => 1,
            PipelineStep::GapAnalysis => 2,
            PipelineStep::AtsScan => 3,
            PipelineStep::Optimization => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PipelineStep::JobAnalysis => "job analysis",
            PipelineStep::GapAnalysis => "gap analysis",
            PipelineStep::AtsScan => "ATS scan",
            PipelineStep::Optimization => "resume optimization",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {} ({})", self.number(), self.label())
    }
}

/// A pipeline step failed. Carries the step so callers can tell which one.
#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct AnalysisError {
    pub step: PipelineStep,
    #[source]
    pub source: LlmError,
}

impl AnalysisError {
    pub fn new(step: PipelineStep, source: LlmError) -> Self {
        Self { step, source }
    }
}
