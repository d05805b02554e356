//! Score Aggregator — combines the three component signals into the final
//! analysis record: weighted score, verdict label, and suggestion list.

use serde::{Deserialize, Serialize};

use crate::analysis::review::{MatchLevel, QualitativeReview};
use crate::analysis::round1;
use crate::analysis::similarity::SimilarityResult;
use crate::analysis::skill_match::HardMatchResult;

/// Fixed component weights. An unavailable signal contributes its component
/// default at full weight; weights are never renormalized.
const HARD_MATCH_WEIGHT: f64 = 0.4;
const SEMANTIC_WEIGHT: f64 = 0.4;
const AI_ANALYSIS_WEIGHT: f64 = 0.2;

const MAX_SUGGESTIONS: usize = 5;

/// Coarse three-level relevance label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    High,
    Medium,
    Low,
}

impl Verdict {
    /// final >= 75 -> High; 50 <= final < 75 -> Medium; final < 50 -> Low.
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            Self::High
        } else if score >= 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Per-component scores retained for explainability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub hard_match: f64,
    pub semantic_match: f64,
    pub ai_analysis: f64,
}

/// Final aggregate for one (resume, job) pair. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 0-100, one decimal.
    pub relevance_score: f64,
    pub hard_match_score: f64,
    pub semantic_score: f64,
    pub ai_score: f64,
    pub verdict: Verdict,
    pub confidence: f64,
    pub missing_skills: Vec<String>,
    pub found_skills: Vec<String>,
    /// At most five entries.
    pub suggestions: Vec<String>,
    pub detailed_feedback: String,
    pub score_breakdown: ScoreBreakdown,
}

impl AnalysisResult {
    /// Total-failure floor: a complete, well-typed record with minimum
    /// scores. Analysis never surfaces an error to its caller.
    pub fn from_error(error: &str) -> Self {
        Self {
            relevance_score: 0.0,
            hard_match_score: 0.0,
            semantic_score: 0.0,
            ai_score: 0.0,
            verdict: Verdict::Low,
            confidence: 0.1,
            missing_skills: Vec::new(),
            found_skills: Vec::new(),
            suggestions: vec![format!("Error during analysis: {error}")],
            detailed_feedback: format!("Analysis failed: {error}"),
            score_breakdown: ScoreBreakdown::default(),
        }
    }
}

/// Combines the three signals: 0.4*hard + 0.4*semantic + 0.2*review.
pub fn aggregate(
    hard: &HardMatchResult,
    similarity: &SimilarityResult,
    review: &QualitativeReview,
) -> AnalysisResult {
    let final_score = round1(
        hard.score * HARD_MATCH_WEIGHT
            + similarity.score * SEMANTIC_WEIGHT
            + review.score * AI_ANALYSIS_WEIGHT,
    );

    AnalysisResult {
        relevance_score: final_score,
        hard_match_score: hard.score,
        semantic_score: similarity.score,
        ai_score: review.score,
        verdict: Verdict::from_score(final_score),
        confidence: review.confidence,
        missing_skills: review.missing_skills.clone(),
        found_skills: hard.found_skills.clone(),
        suggestions: build_suggestions(review),
        detailed_feedback: review.detailed_feedback.clone(),
        score_breakdown: ScoreBreakdown {
            hard_match: hard.score,
            semantic_match: similarity.score,
            ai_analysis: review.score,
        },
    }
}

/// Suggestion list: review improvement areas first, then a synthesized
/// missing-skills line, then fixed experience/education hints. Three generic
/// suggestions substitute when nothing else applies. Capped at five.
fn build_suggestions(review: &QualitativeReview) -> Vec<String> {
    let mut suggestions: Vec<String> = review.improvement_areas.clone();

    if !review.missing_skills.is_empty() {
        let listed: Vec<&str> = review
            .missing_skills
            .iter()
            .take(5)
            .map(String::as_str)
            .collect();
        suggestions.push(format!(
            "Consider adding these skills to your resume: {}",
            listed.join(", ")
        ));
    }

    if review.experience_match == MatchLevel::Poor {
        suggestions.push(
            "Highlight relevant projects or experience that demonstrate your capabilities"
                .to_string(),
        );
    }

    if review.education_match == MatchLevel::Poor {
        suggestions
            .push("Consider pursuing relevant certifications or additional training".to_string());
    }

    if suggestions.is_empty() {
        suggestions = vec![
            "Tailor your resume to better match the job requirements".to_string(),
            "Add more specific examples of your achievements".to_string(),
            "Include relevant keywords from the job description".to_string(),
        ];
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::review::Recommendation;
    use crate::analysis::similarity::SimilarityMethod;

    fn hard(score: f64) -> HardMatchResult {
        HardMatchResult {
            score,
            found_skills: vec!["python".to_string()],
            ..Default::default()
        }
    }

    fn sim(score: f64) -> SimilarityResult {
        SimilarityResult {
            score,
            method: SimilarityMethod::WordOverlap,
            explanation: None,
            key_matches: None,
            key_gaps: None,
            error: None,
        }
    }

    fn review(score: f64) -> QualitativeReview {
        QualitativeReview {
            score,
            confidence: 0.9,
            missing_skills: Vec::new(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            experience_match: MatchLevel::Good,
            education_match: MatchLevel::Good,
            overall_fit: MatchLevel::Good,
            detailed_feedback: "feedback".to_string(),
            improvement_areas: Vec::new(),
            recommendation: Recommendation::Interview,
        }
    }

    #[test]
    fn test_weighted_final_score() {
        // 80*0.4 + 70*0.4 + 60*0.2 = 72.0
        let result = aggregate(&hard(80.0), &sim(70.0), &review(60.0));
        assert_eq!(result.relevance_score, 72.0);
        assert_eq!(result.score_breakdown.hard_match, 80.0);
        assert_eq!(result.score_breakdown.semantic_match, 70.0);
        assert_eq!(result.score_breakdown.ai_analysis, 60.0);
    }

    #[test]
    fn test_final_score_rounds_to_one_decimal() {
        // 33.3*0.4 + 33.3*0.4 + 33.3*0.2 = 33.3 exactly; try uneven inputs
        // 55.5*0.4 + 44.4*0.4 + 61.1*0.2 = 22.2 + 17.76 + 12.22 = 52.18 -> 52.2
        let result = aggregate(&hard(55.5), &sim(44.4), &review(61.1));
        assert_eq!(result.relevance_score, 52.2);
    }

    #[test]
    fn test_verdict_boundaries() {
        assert_eq!(Verdict::from_score(75.0), Verdict::High);
        assert_eq!(Verdict::from_score(74.9), Verdict::Medium);
        assert_eq!(Verdict::from_score(50.0), Verdict::Medium);
        assert_eq!(Verdict::from_score(49.9), Verdict::Low);
    }

    #[test]
    fn test_suggestions_start_with_improvement_areas() {
        let mut r = review(70.0);
        r.improvement_areas = vec!["area1".to_string(), "area2".to_string()];
        let result = aggregate(&hard(70.0), &sim(70.0), &r);
        assert_eq!(result.suggestions[0], "area1");
        assert_eq!(result.suggestions[1], "area2");
    }

    #[test]
    fn test_missing_skills_synthesize_one_line() {
        let mut r = review(70.0);
        r.missing_skills = (1..=7).map(|i| format!("skill{i}")).collect();
        let result = aggregate(&hard(70.0), &sim(70.0), &r);
        let line = &result.suggestions[0];
        assert!(line.starts_with("Consider adding these skills"));
        assert!(line.contains("skill5"));
        // Only the first five missing skills are listed
        assert!(!line.contains("skill6"));
    }

    #[test]
    fn test_poor_experience_and_education_add_fixed_hints() {
        let mut r = review(40.0);
        r.experience_match = MatchLevel::Poor;
        r.education_match = MatchLevel::Poor;
        let result = aggregate(&hard(40.0), &sim(40.0), &r);
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.contains("Highlight relevant projects")));
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.contains("certifications")));
    }

    #[test]
    fn test_generic_suggestions_when_nothing_applies() {
        let result = aggregate(&hard(70.0), &sim(70.0), &review(70.0));
        assert_eq!(result.suggestions.len(), 3);
        assert!(result.suggestions[0].contains("Tailor your resume"));
    }

    #[test]
    fn test_suggestions_capped_at_five() {
        let mut r = review(40.0);
        r.improvement_areas = (1..=6).map(|i| format!("area{i}")).collect();
        r.missing_skills = vec!["docker".to_string()];
        r.experience_match = MatchLevel::Poor;
        let result = aggregate(&hard(40.0), &sim(40.0), &r);
        assert_eq!(result.suggestions.len(), 5);
        assert_eq!(result.suggestions[4], "area5");
    }

    #[test]
    fn test_error_result_is_complete_and_low() {
        let result = AnalysisResult::from_error("llm exploded");
        assert_eq!(result.relevance_score, 0.0);
        assert_eq!(result.hard_match_score, 0.0);
        assert_eq!(result.semantic_score, 0.0);
        assert_eq!(result.ai_score, 0.0);
        assert_eq!(result.verdict, Verdict::Low);
        assert_eq!(result.confidence, 0.1);
        assert!(result.suggestions[0].contains("llm exploded"));
        assert!(result.detailed_feedback.starts_with("Analysis failed:"));
    }

    #[test]
    fn test_confidence_and_feedback_come_from_review() {
        let result = aggregate(&hard(80.0), &sim(80.0), &review(80.0));
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.detailed_feedback, "feedback");
        assert_eq!(result.found_skills, vec!["python"]);
    }
}
