//! Scoring engine — orchestrates the three signals for one (resume, job)
//! pair and fans out batches with bounded concurrency.
//!
//! `analyze` never returns an error: every failure mode inside the pipeline
//! degrades to a component default, and a panicking component is caught at
//! the task boundary and floored to `AnalysisResult::from_error`.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::analysis::aggregate::{aggregate, AnalysisResult};
use crate::analysis::requirements::StructuredRequirements;
use crate::analysis::review::Reviewer;
use crate::analysis::similarity::SimilarityEstimator;
use crate::analysis::skill_match::match_skills;
use crate::llm_client::LlmCapability;

pub struct ScoringEngine {
    similarity: Arc<SimilarityEstimator>,
    reviewer: Arc<Reviewer>,
}

impl ScoringEngine {
    pub fn new(llm: Arc<dyn LlmCapability>) -> Self {
        Self {
            similarity: Arc::new(SimilarityEstimator::new(llm.clone())),
            reviewer: Arc::new(Reviewer::new(llm)),
        }
    }

    /// Complete analysis of one resume against one job.
    ///
    /// The skill match runs inline (pure); similarity and review are
    /// independent and run concurrently as spawned tasks.
    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
        requirements: &StructuredRequirements,
    ) -> AnalysisResult {
        if resume_text.trim().is_empty() {
            return AnalysisResult::from_error("resume text is empty");
        }

        let hard = match_skills(resume_text, requirements);

        let similarity_task = tokio::spawn({
            let estimator = Arc::clone(&self.similarity);
            let resume = resume_text.to_string();
            let jd = job_description.to_string();
            async move { estimator.estimate(&resume, &jd).await }
        });
        let review_task = tokio::spawn({
            let reviewer = Arc::clone(&self.reviewer);
            let resume = resume_text.to_string();
            let jd = job_description.to_string();
            let reqs = requirements.clone();
            async move { reviewer.review(&resume, &jd, &reqs).await }
        });

        let (similarity, review) = match tokio::try_join!(similarity_task, review_task) {
            Ok(pair) => pair,
            Err(e) => {
                error!("Scoring component aborted: {e}");
                return AnalysisResult::from_error(&e.to_string());
            }
        };

        let result = aggregate(&hard, &similarity, &review);
        info!(
            score = result.relevance_score,
            verdict = ?result.verdict,
            method = ?similarity.method,
            "Resume analysis complete"
        );
        result
    }

    /// Analyzes many resumes against one job, at most `max_concurrent` at a
    /// time (the cap keeps the LLM provider's rate limits in reach).
    ///
    /// Results are returned in input order. Analyses share no mutable state;
    /// one resume's failure degrades that item only and never aborts the
    /// batch.
    pub async fn analyze_batch(
        self: &Arc<Self>,
        resume_texts: &[String],
        job_description: &str,
        requirements: &StructuredRequirements,
        max_concurrent: usize,
    ) -> Vec<AnalysisResult> {
        let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

        let handles: Vec<_> = resume_texts
            .iter()
            .map(|text| {
                let engine = Arc::clone(self);
                let semaphore = Arc::clone(&semaphore);
                let resume = text.clone();
                let jd = job_description.to_string();
                let reqs = requirements.clone();
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .expect("semaphore is never closed");
                    engine.analyze(&resume, &jd, &reqs).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(
                handle
                    .await
                    .unwrap_or_else(|e| AnalysisResult::from_error(&e.to_string())),
            );
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate::Verdict;
    use crate::analysis::round1;
    use crate::analysis::similarity::SimilarityMethod;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    struct FailingLlm;

    #[async_trait]
    impl LlmCapability for FailingLlm {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    struct PanickingLlm;

    #[async_trait]
    impl LlmCapability for PanickingLlm {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            panic!("provider client blew up");
        }
    }

    const FIXTURE_JD: &str =
        "Backend role. Must have python and sql. Docker is a plus. 3+ years of experience.";
    const FIXTURE_RESUME: &str =
        "Engineer with python and sql experience building data services.";

    fn requirements() -> StructuredRequirements {
        StructuredRequirements {
            must_have_skills: vec!["python".to_string(), "sql".to_string()],
            good_to_have_skills: vec!["docker".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_llm_unavailable_end_to_end() {
        let llm: Arc<dyn LlmCapability> = Arc::new(FailingLlm);
        let engine = ScoringEngine::new(llm.clone());

        let result = engine
            .analyze(FIXTURE_RESUME, FIXTURE_JD, &requirements())
            .await;

        // Both must-have skills present, docker missing
        assert_eq!(result.hard_match_score, 100.0);
        // Review degraded to its neutral default
        assert_eq!(result.ai_score, 50.0);
        assert_eq!(result.confidence, 0.5);

        // Exact arithmetic for the fixture pair: the similarity term is
        // whatever the lexical chain produces for these two texts
        let similarity = SimilarityEstimator::new(llm)
            .estimate(FIXTURE_RESUME, FIXTURE_JD)
            .await;
        assert_ne!(similarity.method, SimilarityMethod::LlmSemantic);
        let expected = round1(100.0 * 0.4 + similarity.score * 0.4 + 50.0 * 0.2);
        assert_eq!(result.relevance_score, expected);
        assert_eq!(result.semantic_score, similarity.score);
    }

    #[tokio::test]
    async fn test_panicking_component_degrades_without_propagating() {
        let engine = ScoringEngine::new(Arc::new(PanickingLlm));
        let result = engine
            .analyze(FIXTURE_RESUME, FIXTURE_JD, &requirements())
            .await;

        assert_eq!(result.relevance_score, 0.0);
        assert_eq!(result.verdict, Verdict::Low);
        assert_eq!(result.confidence, 0.1);
        assert_eq!(result.score_breakdown.hard_match, 0.0);
        assert!(result.suggestions[0].starts_with("Error during analysis:"));
    }

    #[tokio::test]
    async fn test_empty_resume_text_is_floored() {
        let engine = ScoringEngine::new(Arc::new(FailingLlm));
        let result = engine.analyze("   ", FIXTURE_JD, &requirements()).await;
        assert_eq!(result.relevance_score, 0.0);
        assert_eq!(result.verdict, Verdict::Low);
    }

    #[tokio::test]
    async fn test_analysis_is_repeatable_without_llm() {
        let engine = ScoringEngine::new(Arc::new(FailingLlm));
        let first = engine
            .analyze(FIXTURE_RESUME, FIXTURE_JD, &requirements())
            .await;
        let second = engine
            .analyze(FIXTURE_RESUME, FIXTURE_JD, &requirements())
            .await;
        assert_eq!(first.relevance_score, second.relevance_score);
        assert_eq!(first.found_skills, second.found_skills);
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        let engine = Arc::new(ScoringEngine::new(Arc::new(FailingLlm)));
        let resumes = vec![
            FIXTURE_RESUME.to_string(),
            "".to_string(), // rejected by the empty-text guard
            "python developer".to_string(),
        ];
        let results = engine
            .analyze_batch(&resumes, FIXTURE_JD, &requirements(), 2)
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].hard_match_score, 100.0);
        // The failed item is floored, not dropped, and does not abort the rest
        assert_eq!(results[1].relevance_score, 0.0);
        assert_eq!(results[1].verdict, Verdict::Low);
        assert_eq!(results[2].hard_match_score, 50.0);
    }

    #[tokio::test]
    async fn test_batch_respects_minimum_concurrency() {
        let engine = Arc::new(ScoringEngine::new(Arc::new(FailingLlm)));
        let resumes = vec![FIXTURE_RESUME.to_string(); 4];
        // A cap of 0 is clamped to 1 rather than deadlocking
        let results = engine
            .analyze_batch(&resumes, FIXTURE_JD, &requirements(), 0)
            .await;
        assert_eq!(results.len(), 4);
    }
}
