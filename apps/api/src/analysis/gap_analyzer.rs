//! Step 2 — scores the resume against the Step 1 job analysis and lists missing keywords.

use tracing::debug;

use crate::analysis::prompts::GAP_ANALYSIS_PROMPT_TEMPLATE;
use crate::analysis::{AnalysisError, PipelineStep};
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, RECRUITER_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::analysis::{GapAnalysis, JobAnalysis};

#[derive(Clone)]
pub struct GapAnalyzer {
    llm: LlmClient,
}

impl GapAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    pub async fn analyze(
        &self,
        resume_text: &str,
        job_analysis: &JobAnalysis,
    ) -> Result<GapAnalysis, AnalysisError> {
        let fail = |e: LlmError| AnalysisError::new(PipelineStep::GapAnalysis, e);

        let job_analysis_json =
            serde_json::to_string_pretty(job_analysis).map_err(|e| fail(e.into()))?;

        // Resume text is substituted last so its contents are never re-scanned for placeholders.
        let prompt = GAP_ANALYSIS_PROMPT_TEMPLATE
            .replace("{json_only}", JSON_ONLY_INSTRUCTION)
            .replace("{job_analysis}", &job_analysis_json)
            .replace("{resume_text}", resume_text);

        let analysis: GapAnalysis = self
            .llm
            .send_json(&prompt, Some(RECRUITER_SYSTEM))
            .await
            .map_err(fail)?;

        debug!(
            "Gap analysis: match_score={}, {} gaps",
            analysis.match_score,
            analysis.gaps.len()
        );

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::llm_client::testing::ScriptedTransport;
    use crate::models::analysis::{GapItem, GapPriority};

    fn job_analysis() -> JobAnalysis {
        JobAnalysis {
            required_skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            preferred_skills: vec!["Kafka".to_string()],
            key_responsibilities: vec!["Build APIs".to_string()],
            ats_keywords: vec!["Rust".to_string(), "Kafka".to_string()],
        }
    }

    #[tokio::test]
    async fn test_well_formed_json_maps_field_for_field() {
        let transport = ScriptedTransport::new(vec![Ok(r#"{
            "match_score": 78,
            "strengths": ["Five years of Rust"],
            "gaps": [
                {"keyword": "Kafka", "priority": "high", "suggestion": "Mention event pipeline work"}
            ],
            "keyword_matches": {"Rust": true, "Kafka": false}
        }"#
        .to_string())]);
        let analyzer = GapAnalyzer::new(LlmClient::new(transport));

        let analysis = analyzer
            .analyze("Rust engineer resume", &job_analysis())
            .await
            .unwrap();

        assert_eq!(analysis.match_score, 78);
        assert_eq!(analysis.strengths, vec!["Five years of Rust"]);
        assert_eq!(
            analysis.gaps,
            vec![GapItem {
                keyword: "Kafka".to_string(),
                priority: GapPriority::High,
                suggestion: "Mention event pipeline work".to_string(),
            }]
        );
        assert_eq!(
            analysis.keyword_matches,
            BTreeMap::from([("Kafka".to_string(), false), ("Rust".to_string(), true)])
        );
    }

    #[tokio::test]
    async fn test_missing_keys_map_to_defaults() {
        let transport =
            ScriptedTransport::new(vec![Ok(r#"{"strengths": ["Clear writing"]}"#.to_string())]);
        let analyzer = GapAnalyzer::new(LlmClient::new(transport));

        let analysis = analyzer.analyze("resume", &job_analysis()).await.unwrap();

        assert_eq!(analysis.match_score, 0);
        assert_eq!(analysis.strengths, vec!["Clear writing"]);
        assert!(analysis.gaps.is_empty());
        assert!(analysis.keyword_matches.is_empty());
    }

    #[tokio::test]
    async fn test_null_values_and_fractional_score_do_not_fail_the_step() {
        let transport = ScriptedTransport::new(vec![Ok(r#"{
            "match_score": 72.5,
            "strengths": null,
            "gaps": [{"keyword": "Kafka", "priority": null, "suggestion": "Add streaming work"}],
            "keyword_matches": null
        }"#
        .to_string())]);
        let analyzer = GapAnalyzer::new(LlmClient::new(transport));

        let analysis = analyzer.analyze("resume", &job_analysis()).await.unwrap();

        assert_eq!(analysis.match_score, 73);
        assert!(analysis.strengths.is_empty());
        assert_eq!(analysis.gaps[0].priority, GapPriority::Medium);
        assert!(analysis.keyword_matches.is_empty());
    }

    #[tokio::test]
    async fn test_null_gaps_list_is_empty() {
        let transport = ScriptedTransport::new(vec![Ok(
            r#"{"match_score": 70, "gaps": null}"#.to_string()
        )]);
        let analyzer = GapAnalyzer::new(LlmClient::new(transport));

        let analysis = analyzer.analyze("resume", &job_analysis()).await.unwrap();

        assert_eq!(analysis.match_score, 70);
        assert!(analysis.gaps.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_contains_serialized_job_analysis_and_resume() {
        let transport = ScriptedTransport::new(vec![Ok("{}".to_string())]);
        let analyzer = GapAnalyzer::new(LlmClient::new(transport.clone()));

        analyzer
            .analyze("RESUME-BODY-MARKER", &job_analysis())
            .await
            .unwrap();

        let prompt = &transport.requests()[0].prompt;
        assert!(prompt.contains("RESUME-BODY-MARKER"));
        assert!(prompt.contains("\"required_skills\": ["));
        assert!(prompt.contains("\"PostgreSQL\""));
        assert!(!prompt.contains("{job_analysis}"));
    }

    #[tokio::test]
    async fn test_client_failure_is_tagged_as_step_two() {
        let transport = ScriptedTransport::new(vec![Err(LlmError::api(401, "invalid x-api-key"))]);
        let analyzer = GapAnalyzer::new(LlmClient::new(transport));

        let err = analyzer.analyze("resume", &job_analysis()).await.unwrap_err();

        assert_eq!(err.step, PipelineStep::GapAnalysis);
        assert!(matches!(err.source, LlmError::Api { status: 401, .. }));
    }
}
