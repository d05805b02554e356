//! Qualitative Reviewer — one structured LLM call producing a contextual
//! judgement of resume-job fit. Score and confidence are clamped into range
//! regardless of what the model returns; on any call or parse failure the
//! reviewer yields a fixed degraded default instead of an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::prompts::{REVIEW_PROMPT_TEMPLATE, REVIEW_SYSTEM};
use crate::analysis::requirements::StructuredRequirements;
use crate::llm_client::{complete_json, LlmCapability};

/// Coarse fit level for one review dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLevel {
    Good,
    Average,
    Poor,
    #[default]
    Unknown,
}

impl MatchLevel {
    /// Tolerant mapping from free-form model output.
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "good" | "excellent" => Self::Good,
            "average" => Self::Average,
            "poor" => Self::Poor,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Hire,
    Interview,
    Reject,
    #[default]
    ReviewManually,
}

impl Recommendation {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "hire" => Self::Hire,
            "interview" => Self::Interview,
            "reject" => Self::Reject,
            _ => Self::ReviewManually,
        }
    }
}

/// Structured contextual judgement of a resume against a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualitativeReview {
    /// 0-100, clamped.
    pub score: f64,
    /// 0.0-1.0, clamped.
    pub confidence: f64,
    pub missing_skills: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub experience_match: MatchLevel,
    pub education_match: MatchLevel,
    pub overall_fit: MatchLevel,
    pub detailed_feedback: String,
    pub improvement_areas: Vec<String>,
    pub recommendation: Recommendation,
}

impl QualitativeReview {
    /// Degraded default returned when the LLM call or parse fails.
    pub fn degraded(error: &str) -> Self {
        Self {
            score: 50.0,
            confidence: 0.5,
            missing_skills: Vec::new(),
            strengths: Vec::new(),
            weaknesses: vec![format!("Analysis error: {error}")],
            experience_match: MatchLevel::Unknown,
            education_match: MatchLevel::Unknown,
            overall_fit: MatchLevel::Unknown,
            detailed_feedback: format!("AI analysis failed: {error}"),
            improvement_areas: Vec::new(),
            recommendation: Recommendation::ReviewManually,
        }
    }
}

/// Wire format of the model response. Fit fields arrive as free-form strings
/// and are mapped tolerantly; every field is defaulted so partial responses
/// degrade field-by-field.
#[derive(Debug, Deserialize)]
struct ReviewResponse {
    #[serde(default = "default_score")]
    score: f64,
    #[serde(default = "default_confidence")]
    confidence: f64,
    #[serde(default)]
    missing_skills: Vec<String>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    experience_match: String,
    #[serde(default)]
    education_match: String,
    #[serde(default)]
    overall_fit: String,
    #[serde(default)]
    detailed_feedback: String,
    #[serde(default)]
    improvement_areas: Vec<String>,
    #[serde(default)]
    recommendation: String,
}

fn default_score() -> f64 {
    50.0
}

fn default_confidence() -> f64 {
    0.8
}

/// Invokes the LLM capability for the qualitative review.
pub struct Reviewer {
    llm: Arc<dyn LlmCapability>,
}

impl Reviewer {
    pub fn new(llm: Arc<dyn LlmCapability>) -> Self {
        Self { llm }
    }

    /// Reviews a resume against a job description. Never fails.
    pub async fn review(
        &self,
        resume_text: &str,
        job_description: &str,
        requirements: &StructuredRequirements,
    ) -> QualitativeReview {
        let prompt = REVIEW_PROMPT_TEMPLATE
            .replace("{job_description}", job_description)
            .replace("{resume_text}", resume_text)
            .replace(
                "{must_have_skills}",
                &requirements.must_have_skills.join(", "),
            )
            .replace(
                "{good_to_have_skills}",
                &requirements.good_to_have_skills.join(", "),
            );

        match complete_json::<ReviewResponse>(self.llm.as_ref(), &prompt, REVIEW_SYSTEM).await {
            Ok(response) => QualitativeReview {
                score: response.score.clamp(0.0, 100.0),
                confidence: response.confidence.clamp(0.0, 1.0),
                missing_skills: response.missing_skills,
                strengths: response.strengths,
                weaknesses: response.weaknesses,
                experience_match: MatchLevel::parse(&response.experience_match),
                education_match: MatchLevel::parse(&response.education_match),
                overall_fit: MatchLevel::parse(&response.overall_fit),
                detailed_feedback: response.detailed_feedback,
                improvement_areas: response.improvement_areas,
                recommendation: Recommendation::parse(&response.recommendation),
            },
            Err(e) => {
                warn!("Qualitative review failed, returning degraded default: {e}");
                QualitativeReview::degraded(&e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    struct CannedLlm(String);

    #[async_trait]
    impl LlmCapability for CannedLlm {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmCapability for FailingLlm {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    fn reviewer(llm: impl LlmCapability + 'static) -> Reviewer {
        Reviewer::new(Arc::new(llm))
    }

    #[tokio::test]
    async fn test_full_response_maps_into_review() {
        let json = r#"{
            "score": 82,
            "confidence": 0.9,
            "missing_skills": ["docker"],
            "strengths": ["strong python"],
            "weaknesses": ["no cloud exposure"],
            "experience_match": "good",
            "education_match": "average",
            "overall_fit": "good",
            "detailed_feedback": "Solid backend candidate.",
            "improvement_areas": ["add containerization experience"],
            "recommendation": "interview"
        }"#;
        let review = reviewer(CannedLlm(json.to_string()))
            .review("resume", "jd", &StructuredRequirements::default())
            .await;

        assert_eq!(review.score, 82.0);
        assert_eq!(review.confidence, 0.9);
        assert_eq!(review.experience_match, MatchLevel::Good);
        assert_eq!(review.education_match, MatchLevel::Average);
        assert_eq!(review.recommendation, Recommendation::Interview);
        assert_eq!(review.missing_skills, vec!["docker"]);
    }

    #[tokio::test]
    async fn test_out_of_range_values_are_clamped() {
        let json = r#"{"score": 140, "confidence": 3.5}"#;
        let review = reviewer(CannedLlm(json.to_string()))
            .review("resume", "jd", &StructuredRequirements::default())
            .await;
        assert_eq!(review.score, 100.0);
        assert_eq!(review.confidence, 1.0);

        let json = r#"{"score": -20, "confidence": -0.4}"#;
        let review = reviewer(CannedLlm(json.to_string()))
            .review("resume", "jd", &StructuredRequirements::default())
            .await;
        assert_eq!(review.score, 0.0);
        assert_eq!(review.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_missing_fields_take_defaults() {
        let review = reviewer(CannedLlm("{}".to_string()))
            .review("resume", "jd", &StructuredRequirements::default())
            .await;
        assert_eq!(review.score, 50.0);
        assert_eq!(review.confidence, 0.8);
        assert_eq!(review.experience_match, MatchLevel::Unknown);
        assert_eq!(review.recommendation, Recommendation::ReviewManually);
    }

    #[tokio::test]
    async fn test_call_failure_returns_degraded_default() {
        let review = reviewer(FailingLlm)
            .review("resume", "jd", &StructuredRequirements::default())
            .await;
        assert_eq!(review.score, 50.0);
        assert_eq!(review.confidence, 0.5);
        assert_eq!(review.recommendation, Recommendation::ReviewManually);
        assert_eq!(review.overall_fit, MatchLevel::Unknown);
        assert!(review.weaknesses[0].starts_with("Analysis error:"));
        assert!(review.detailed_feedback.starts_with("AI analysis failed:"));
    }

    #[tokio::test]
    async fn test_unparsable_output_returns_degraded_default() {
        let review = reviewer(CannedLlm("certainly! here is my analysis".to_string()))
            .review("resume", "jd", &StructuredRequirements::default())
            .await;
        assert_eq!(review.score, 50.0);
        assert_eq!(review.confidence, 0.5);
    }

    #[test]
    fn test_match_level_tolerant_parse() {
        assert_eq!(MatchLevel::parse("Good"), MatchLevel::Good);
        assert_eq!(MatchLevel::parse("excellent"), MatchLevel::Good);
        assert_eq!(MatchLevel::parse("POOR"), MatchLevel::Poor);
        assert_eq!(MatchLevel::parse("meh"), MatchLevel::Unknown);
        assert_eq!(MatchLevel::parse(""), MatchLevel::Unknown);
    }

    #[test]
    fn test_recommendation_serializes_snake_case() {
        let json = serde_json::to_string(&Recommendation::ReviewManually).unwrap();
        assert_eq!(json, r#""review_manually""#);
        assert_eq!(Recommendation::parse("review_manually"), Recommendation::ReviewManually);
    }
}
