use crate::analysis::pipeline::AnalysisPipeline;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Four-step analysis services, built once in `main`.
    pub pipeline: AnalysisPipeline,
    /// Same client the pipeline uses; health checks read its configuration.
    pub llm: LlmClient,
    pub config: Config,
}

impl AppState {
    pub fn new(llm: LlmClient, config: Config) -> Self {
        Self {
            pipeline: AnalysisPipeline::new(llm.clone()),
            llm,
            config,
        }
    }
}
