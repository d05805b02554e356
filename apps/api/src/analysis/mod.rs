//! The scoring/analysis core: requirement extraction, the three scoring
//! signals (hard match, semantic similarity, qualitative review), and the
//! aggregator that combines them into one `AnalysisResult`.

pub mod aggregate;
pub mod engine;
pub mod handlers;
pub mod prompts;
pub mod requirements;
pub mod review;
pub mod similarity;
pub mod skill_match;
pub mod taxonomy;

/// Scores are reported at one-decimal precision throughout.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
