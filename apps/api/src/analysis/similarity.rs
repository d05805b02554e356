//! Similarity Estimator — semantic closeness between resume and job text.
//!
//! An ordered chain of strategies, first usable result wins:
//! 1. LLM semantic scoring
//! 2. TF-IDF cosine over the two documents
//! 3. Jaccard word overlap
//!
//! A strategy signals "unusable" by returning `None`; the chain falls
//! through to the next. The Jaccard fallback is always usable.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::prompts::{SIMILARITY_PROMPT_TEMPLATE, SIMILARITY_SYSTEM};
use crate::analysis::round1;
use crate::llm_client::{complete_json, LlmCapability};

/// Minimal English stop-word list shared by the lexical strategies.
const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from", "as",
    "is", "are", "was", "were", "be", "been", "being",
];

/// Which strategy produced the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimilarityMethod {
    #[serde(rename = "llm_semantic")]
    LlmSemantic,
    #[serde(rename = "tfidf")]
    TfIdf,
    #[serde(rename = "word_overlap")]
    WordOverlap,
}

/// Output of the similarity estimate. Exactly one method wins per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// 0-100, one decimal.
    pub score: f64,
    pub method: SimilarityMethod,
    /// Present only for the LLM method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_matches: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_gaps: Option<Vec<String>>,
    /// Reason an earlier, preferred strategy was skipped, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[async_trait]
trait SimilarityStrategy: Send + Sync {
    /// Returns `None` when the strategy is unusable for this document pair.
    async fn estimate(&self, resume_text: &str, job_description: &str)
        -> Option<SimilarityResult>;
}

/// Tries each strategy in preference order and returns the first usable result.
pub struct SimilarityEstimator {
    strategies: Vec<Box<dyn SimilarityStrategy>>,
}

impl SimilarityEstimator {
    pub fn new(llm: Arc<dyn LlmCapability>) -> Self {
        Self {
            strategies: vec![
                Box::new(LlmSimilarity { llm }),
                Box::new(TfIdfSimilarity),
                Box::new(WordOverlapSimilarity),
            ],
        }
    }

    /// Lexical-only chain, used when no LLM capability should be consulted.
    #[cfg(test)]
    fn lexical_only() -> Self {
        Self {
            strategies: vec![Box::new(TfIdfSimilarity), Box::new(WordOverlapSimilarity)],
        }
    }

    pub async fn estimate(&self, resume_text: &str, job_description: &str) -> SimilarityResult {
        for strategy in &self.strategies {
            if let Some(result) = strategy.estimate(resume_text, job_description).await {
                return result;
            }
        }
        // The word-overlap fallback never declines, so this is unreachable;
        // return an explicit zero rather than panic if the chain is emptied.
        SimilarityResult {
            score: 0.0,
            method: SimilarityMethod::WordOverlap,
            explanation: None,
            key_matches: None,
            key_gaps: None,
            error: Some("no similarity strategy produced a result".to_string()),
        }
    }
}

// ── LLM semantic strategy ───────────────────────────────────────────────────

struct LlmSimilarity {
    llm: Arc<dyn LlmCapability>,
}

#[derive(Debug, Deserialize)]
struct LlmSimilarityResponse {
    #[serde(default = "default_similarity_score")]
    similarity_score: f64,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    key_matches: Vec<String>,
    #[serde(default)]
    key_gaps: Vec<String>,
}

fn default_similarity_score() -> f64 {
    50.0
}

#[async_trait]
impl SimilarityStrategy for LlmSimilarity {
    async fn estimate(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Option<SimilarityResult> {
        let prompt = SIMILARITY_PROMPT_TEMPLATE
            .replace("{job_description}", job_description)
            .replace("{resume_text}", resume_text);

        let response: LlmSimilarityResponse =
            match complete_json(self.llm.as_ref(), &prompt, SIMILARITY_SYSTEM).await {
                Ok(r) => r,
                Err(e) => {
                    warn!("LLM semantic similarity failed, trying next strategy: {e}");
                    return None;
                }
            };

        let score = response.similarity_score.clamp(0.0, 100.0);
        // A score of exactly 0 is treated as a disguised failure and falls
        // through to the lexical strategies. Known ambiguity: a genuinely
        // zero-similarity pair cannot be represented via this path.
        if score == 0.0 {
            warn!("LLM semantic similarity returned 0, trying next strategy");
            return None;
        }

        Some(SimilarityResult {
            score: round1(score),
            method: SimilarityMethod::LlmSemantic,
            explanation: Some(response.explanation),
            key_matches: Some(response.key_matches),
            key_gaps: Some(response.key_gaps),
            error: None,
        })
    }
}

// ── TF-IDF cosine strategy ──────────────────────────────────────────────────

struct TfIdfSimilarity;

#[async_trait]
impl SimilarityStrategy for TfIdfSimilarity {
    async fn estimate(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Option<SimilarityResult> {
        let similarity = tfidf_cosine(resume_text, job_description)?;
        let score = (similarity * 100.0).clamp(0.0, 100.0);
        Some(SimilarityResult {
            score: round1(score),
            method: SimilarityMethod::TfIdf,
            explanation: None,
            key_matches: None,
            key_gaps: None,
            error: None,
        })
    }
}

/// Cosine similarity of TF-IDF vectors fitted on exactly these two documents.
/// Smoothed idf: ln((1 + n) / (1 + df)) + 1 over n = 2 documents.
/// Returns `None` when the shared vocabulary is empty (strategy unusable).
fn tfidf_cosine(doc_a: &str, doc_b: &str) -> Option<f64> {
    let terms_a = term_counts(doc_a);
    let terms_b = term_counts(doc_b);
    if terms_a.is_empty() && terms_b.is_empty() {
        return None;
    }

    let vocabulary: HashSet<&String> = terms_a.keys().chain(terms_b.keys()).collect();

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for term in vocabulary {
        let df = [&terms_a, &terms_b]
            .iter()
            .filter(|d| d.contains_key(term))
            .count() as f64;
        let idf = ((1.0 + 2.0) / (1.0 + df)).ln() + 1.0;

        let weight_a = terms_a.get(term).copied().unwrap_or(0) as f64 * idf;
        let weight_b = terms_b.get(term).copied().unwrap_or(0) as f64 * idf;
        dot += weight_a * weight_b;
        norm_a += weight_a * weight_a;
        norm_b += weight_b * weight_b;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Term frequencies over lowercased word tokens, stop words removed.
fn term_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

// ── Jaccard word-overlap fallback ───────────────────────────────────────────

struct WordOverlapSimilarity;

#[async_trait]
impl SimilarityStrategy for WordOverlapSimilarity {
    async fn estimate(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Option<SimilarityResult> {
        Some(word_overlap(resume_text, job_description))
    }
}

/// Jaccard similarity over word token sets with stop words removed.
/// An empty union scores 0, not an error.
fn word_overlap(resume_text: &str, job_description: &str) -> SimilarityResult {
    let resume_words: HashSet<String> = tokenize(resume_text).collect();
    let jd_words: HashSet<String> = tokenize(job_description).collect();

    let intersection = resume_words.intersection(&jd_words).count();
    let union = resume_words.union(&jd_words).count();

    let jaccard = if union > 0 {
        intersection as f64 / union as f64
    } else {
        0.0
    };

    SimilarityResult {
        score: round1(jaccard * 100.0),
        method: SimilarityMethod::WordOverlap,
        explanation: None,
        key_matches: None,
        key_gaps: None,
        error: None,
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    let pattern = Regex::new(r"\w+").expect("token regex is valid");
    let lower = text.to_lowercase();
    pattern
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect::<Vec<_>>()
        .into_iter()
}
