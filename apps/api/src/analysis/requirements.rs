//! Job Requirement Extractor — turns a free-text job description into a
//! `StructuredRequirements` object via two independent extractors (rule-based
//! and LLM) merged into one result.
//!
//! The LLM path is fallible: on call or parse failure the extractor degrades
//! to the rule-based result alone, logged as non-fatal.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::prompts::{EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM};
use crate::analysis::taxonomy::{
    EDUCATION_KEYWORDS, GOOD_TO_HAVE_INDICATORS, MUST_HAVE_INDICATORS, SKILL_CATEGORIES,
};
use crate::llm_client::{complete_json, LlmCapability};

/// Characters of context inspected on each side of a skill's first mention
/// when classifying it as must-have vs good-to-have.
const CONTEXT_WINDOW: usize = 100;

/// Structured requirements derived from a job description.
/// Created once per job posting and immutable thereafter; every resume
/// analysis against the job reads the same object.
///
/// Every field is serde-defaulted so a partially-conforming LLM response
/// degrades field-by-field rather than failing the whole parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredRequirements {
    #[serde(default)]
    pub role_title: Option<String>,
    #[serde(default)]
    pub must_have_skills: Vec<String>,
    #[serde(default)]
    pub good_to_have_skills: Vec<String>,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub experience_required: String,
    #[serde(default)]
    pub key_responsibilities: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub education_level: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub employment_type: String,
}

/// Runs the rule-based and LLM extractors and merges their output.
pub struct RequirementsExtractor {
    llm: Arc<dyn LlmCapability>,
}

impl RequirementsExtractor {
    pub fn new(llm: Arc<dyn LlmCapability>) -> Self {
        Self { llm }
    }

    /// Extracts structured requirements from a job description.
    ///
    /// Never fails: if the LLM extractor errors or returns unparsable output,
    /// the rule-based result is used alone.
    pub async fn extract(&self, job_description: &str) -> StructuredRequirements {
        let rules = extract_with_rules(job_description);

        let prompt = EXTRACTION_PROMPT_TEMPLATE.replace("{job_description}", job_description);
        match complete_json::<StructuredRequirements>(self.llm.as_ref(), &prompt, EXTRACTION_SYSTEM)
            .await
        {
            Ok(llm_result) => merge(llm_result, rules),
            Err(e) => {
                warn!("LLM requirement extraction failed, using rule-based parsing: {e}");
                rules
            }
        }
    }
}

/// Rule-based extraction over the curated skill taxonomy.
///
/// Each taxonomy skill found in the text (case-insensitive) is classified by
/// indicator language in a ±100-character window around its first occurrence:
/// must-have indicators win, then good-to-have, defaulting to must-have.
pub fn extract_with_rules(job_description: &str) -> StructuredRequirements {
    let text_lower = job_description.to_lowercase();

    let mut found_skills: Vec<String> = Vec::new();
    for (_, skills) in SKILL_CATEGORIES {
        for skill in *skills {
            if text_lower.contains(skill) {
                found_skills.push(skill.to_string());
            }
        }
    }

    let mut must_have_skills = Vec::new();
    let mut good_to_have_skills = Vec::new();

    for skill in &found_skills {
        let context = skill_context(skill, &text_lower, CONTEXT_WINDOW);
        if MUST_HAVE_INDICATORS.iter().any(|i| context.contains(i)) {
            must_have_skills.push(skill.clone());
        } else if GOOD_TO_HAVE_INDICATORS.iter().any(|i| context.contains(i)) {
            good_to_have_skills.push(skill.clone());
        } else {
            // No clear indicator language: treat as must-have
            must_have_skills.push(skill.clone());
        }
    }

    let experience_required = extract_experience_years(&text_lower)
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Not specified".to_string());

    let qualifications: Vec<String> = EDUCATION_KEYWORDS
        .iter()
        .filter(|k| text_lower.contains(*k))
        .map(|k| k.to_string())
        .collect();

    StructuredRequirements {
        role_title: None,
        must_have_skills: dedup_preserving_order(must_have_skills),
        good_to_have_skills: dedup_preserving_order(good_to_have_skills),
        qualifications,
        experience_required,
        key_responsibilities: Vec::new(),
        technologies: dedup_preserving_order(found_skills),
        soft_skills: Vec::new(),
        education_level: "Not specified".to_string(),
        industry: "Not specified".to_string(),
        employment_type: "Not specified".to_string(),
    }
}

/// Parses "N years/yrs of experience" phrasing; first match wins.
pub fn extract_experience_years(text_lower: &str) -> Option<u32> {
    let pattern = Regex::new(r"(\d+)[\+\-\s]*(?:years?|yrs?)\s*(?:of\s*)?(?:experience|exp)")
        .expect("experience regex is valid");
    pattern
        .captures(text_lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Returns the text surrounding the FIRST occurrence of `skill`.
/// Later mentions with different indicator language are not reconciled.
fn skill_context(skill: &str, text_lower: &str, window: usize) -> String {
    let index = match text_lower.find(skill) {
        Some(i) => i,
        None => return String::new(),
    };

    let start = snap_to_char_boundary(text_lower, index.saturating_sub(window));
    let end = snap_to_char_boundary(
        text_lower,
        (index + skill.len() + window).min(text_lower.len()),
    );
    text_lower[start..end].to_string()
}

fn snap_to_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index.min(text.len())
}

/// Merge policy: the LLM result wins; empty must-have/good-to-have lists are
/// substituted from the rule-based result, technology sets are unioned, and a
/// missing experience value falls back to the rule-based parse.
fn merge(
    llm_result: StructuredRequirements,
    rules: StructuredRequirements,
) -> StructuredRequirements {
    let mut merged = llm_result;

    merged.must_have_skills = normalize_skills(merged.must_have_skills);
    merged.good_to_have_skills = normalize_skills(merged.good_to_have_skills);

    if merged.must_have_skills.is_empty() {
        merged.must_have_skills = rules.must_have_skills;
    }
    if merged.good_to_have_skills.is_empty() {
        merged.good_to_have_skills = rules.good_to_have_skills;
    }

    let mut technologies = normalize_skills(merged.technologies);
    for tech in rules.technologies {
        if !technologies.iter().any(|t| t.eq_ignore_ascii_case(&tech)) {
            technologies.push(tech);
        }
    }
    merged.technologies = technologies;

    if merged.experience_required.is_empty() || merged.experience_required == "Not specified" {
        merged.experience_required = rules.experience_required;
    }

    merged
}

/// Trims entries, drops empties, dedups preserving first-occurrence order.
fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    dedup_preserving_order(
        skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for item in items {
        if !seen.iter().any(|s: &String| s.eq_ignore_ascii_case(&item)) {
            seen.push(item);
        }
    }
    seen
}

/// Top-50 most frequent meaningful tokens of a job description, for
/// recruiter-facing display on the job resource.
pub fn extract_keywords(job_description: &str) -> Vec<String> {
    const STOP_WORDS: &[&str] = &[
        "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from",
        "as", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
        "does", "did", "will", "would", "could", "should", "may", "might", "must", "can", "this",
        "that", "these", "those", "a", "an", "we", "you", "they", "our", "your", "their",
    ];

    let token_pattern = Regex::new(r"\w+").expect("token regex is valid");
    let text_lower = job_description.to_lowercase();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for m in token_pattern.find_iter(&text_lower) {
        let word = m.as_str();
        if word.len() > 2 && !STOP_WORDS.contains(&word) {
            if !counts.contains_key(word) {
                order.push(word);
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    // Stable ranking: frequency desc, then first occurrence in the text
    order.sort_by_key(|w| std::cmp::Reverse(counts[w]));
    order.into_iter().take(50).map(str::to_string).collect()
}
