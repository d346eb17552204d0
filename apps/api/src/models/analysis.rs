//! Records produced by the four pipeline steps.
//!
//! Deserialization is the one boundary between model output and these types:
//! every field carries a serde default so a missing key maps to its documented
//! default instead of an error. An explicit `null` is treated the same way, and
//! scores accept fractional numbers (rounded, never clamped).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let score = Option::<f64>::deserialize(deserializer)?;
    Ok(score.map_or(0, |s| s.round() as i64))
}

/// Step 1 output: what the job asks for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobAnalysis {
    #[serde(deserialize_with = "null_as_default")]
    pub required_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub preferred_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub key_responsibilities: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub ats_keywords: Vec<String>,
}

/// Urgency of a missing keyword. Values the model invents are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GapPriority {
    Critical,
    High,
    #[default]
    Medium,
    Other(String),
}

impl From<String> for GapPriority {
    fn from(value: String) -> Self {
        match value.as_str() {
            "critical" => GapPriority::Critical,
            "high" => GapPriority::High,
            "medium" => GapPriority::Medium,
            _ => GapPriority::Other(value),
        }
    }
}

impl From<GapPriority> for String {
    fn from(value: GapPriority) -> Self {
        match value {
            GapPriority::Critical => "critical".to_string(),
            GapPriority::High => "high".to_string(),
            GapPriority::Medium => "medium".to_string(),
            GapPriority::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapItem {
    #[serde(deserialize_with = "null_as_default")]
    pub keyword: String,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: GapPriority,
    #[serde(deserialize_with = "null_as_default")]
    pub suggestion: String,
}

/// Step 2 output: how the resume measures up against the job.
/// `match_score` is reported as the model gave it; it is not clamped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapAnalysis {
    #[serde(deserialize_with = "lenient_score")]
    pub match_score: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub gaps: Vec<GapItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub keyword_matches: BTreeMap<String, bool>,
}

/// Always serialized with all three categories, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtsIssues {
    #[serde(deserialize_with = "null_as_default")]
    pub formatting: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub content: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionReadability {
    Excellent,
    Good,
    NeedsImprovement,
    Missing,
    Other(String),
}

impl From<String> for SectionReadability {
    fn from(value: String) -> Self {
        match value.as_str() {
            "excellent" => SectionReadability::Excellent,
            "good" => SectionReadability::Good,
            "needs_improvement" => SectionReadability::NeedsImprovement,
            "missing" => SectionReadability::Missing,
            _ => SectionReadability::Other(value),
        }
    }
}

impl From<SectionReadability> for String {
    fn from(value: SectionReadability) -> Self {
        match value {
            SectionReadability::Excellent => "excellent".to_string(),
            SectionReadability::Good => "good".to_string(),
            SectionReadability::NeedsImprovement => "needs_improvement".to_string(),
            SectionReadability::Missing => "missing".to_string(),
            SectionReadability::Other(raw) => raw,
        }
    }
}

/// Step 3 output: machine-readability of the resume, independent of the job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtsScan {
    #[serde(deserialize_with = "lenient_score")]
    pub ats_score: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub issues: AtsIssues,
    #[serde(deserialize_with = "null_as_default")]
    pub section_readability: BTreeMap<String, SectionReadability>,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
}

/// Step 4 output. Lengths are character counts, not bytes or tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedResume {
    pub formatted_text: String,
    pub original_length: usize,
    pub optimized_length: usize,
}

/// One complete pipeline invocation. Lives only for the request that created it.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRun {
    pub id: Uuid,
    pub job_analysis: JobAnalysis,
    pub gap_analysis: GapAnalysis,
    pub ats_scan: AtsScan,
    pub optimized_resume: OptimizedResume,
}
