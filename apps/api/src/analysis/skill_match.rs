//! Skill Matcher — deterministic keyword/skill presence scoring.
//!
//! Pure function of (resume text, requirements): no external calls, no
//! randomness. Two runs on identical input produce identical output.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::requirements::StructuredRequirements;
use crate::analysis::round1;
use crate::analysis::taxonomy::skill_variations;

/// Found/total counts per requirement category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
    pub must_have_found: usize,
    pub must_have_total: usize,
    pub good_to_have_found: usize,
    pub good_to_have_total: usize,
}

/// Output of the hard (keyword) match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardMatchResult {
    /// 0-100, one decimal. min(100, must_have_fraction*100 + good_to_have_fraction*50).
    pub score: f64,
    /// Skills found across must-have, good-to-have, and technologies, deduplicated.
    pub found_skills: Vec<String>,
    pub missing_must_have: Vec<String>,
    pub missing_good_to_have: Vec<String>,
    pub match_counts: MatchCounts,
}

/// Scores a resume against requirement skills by keyword presence.
pub fn match_skills(resume_text: &str, requirements: &StructuredRequirements) -> HardMatchResult {
    let resume_lower = resume_text.to_lowercase();

    let found_must_have: Vec<String> = requirements
        .must_have_skills
        .iter()
        .filter(|s| skill_mentioned(s, &resume_lower))
        .cloned()
        .collect();
    let found_good_to_have: Vec<String> = requirements
        .good_to_have_skills
        .iter()
        .filter(|s| skill_mentioned(s, &resume_lower))
        .cloned()
        .collect();
    let found_technologies: Vec<String> = requirements
        .technologies
        .iter()
        .filter(|s| skill_mentioned(s, &resume_lower))
        .cloned()
        .collect();

    // Empty category contributes 0, never a division error
    let must_have_score = if requirements.must_have_skills.is_empty() {
        0.0
    } else {
        found_must_have.len() as f64 / requirements.must_have_skills.len() as f64 * 100.0
    };
    let good_to_have_score = if requirements.good_to_have_skills.is_empty() {
        0.0
    } else {
        found_good_to_have.len() as f64 / requirements.good_to_have_skills.len() as f64 * 50.0
    };

    let score = (must_have_score + good_to_have_score).min(100.0);

    let mut found_skills = Vec::new();
    for skill in found_must_have
        .iter()
        .chain(found_good_to_have.iter())
        .chain(found_technologies.iter())
    {
        if !found_skills
            .iter()
            .any(|s: &String| s.eq_ignore_ascii_case(skill))
        {
            found_skills.push(skill.clone());
        }
    }

    HardMatchResult {
        score: round1(score),
        found_skills,
        missing_must_have: requirements
            .must_have_skills
            .iter()
            .filter(|s| !found_must_have.contains(s))
            .cloned()
            .collect(),
        missing_good_to_have: requirements
            .good_to_have_skills
            .iter()
            .filter(|s| !found_good_to_have.contains(s))
            .cloned()
            .collect(),
        match_counts: MatchCounts {
            must_have_found: found_must_have.len(),
            must_have_total: requirements.must_have_skills.len(),
            good_to_have_found: found_good_to_have.len(),
            good_to_have_total: requirements.good_to_have_skills.len(),
        },
    }
}

/// Presence test for one skill against lowercased resume text.
///
/// The skill and each known alias are tried in turn. Plain single-word
/// candidates require a word-boundary match so that "r" cannot hit inside
/// "framework"; multi-word and punctuated names ("machine learning", "c++",
/// "node.js") use a substring match — `\b` cannot anchor after `+` or `#`.
pub fn skill_mentioned(skill: &str, text_lower: &str) -> bool {
    for candidate in skill_variations(skill) {
        let is_plain_word = candidate.chars().all(|c| c.is_alphanumeric() || c == '_');
        let mentioned = if is_plain_word {
            word_boundary_match(&candidate, text_lower)
        } else {
            text_lower.contains(&candidate)
        };
        if mentioned {
            return true;
        }
    }
    false
}

fn word_boundary_match(word: &str, text: &str) -> bool {
    let pattern = format!(r"\b{}\b", regex::escape(word));
    Regex::new(&pattern)
        .expect("escaped word pattern is valid")
        .is_match(text)
}
