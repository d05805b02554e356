//! Curated skill taxonomy and alias table shared by the rule-based extractor
//! and the skill matcher. All entries are lowercase.

/// Skill categories scanned by the rule-based requirement extractor.
pub const SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "programming_languages",
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "php", "ruby", "go",
            "rust", "kotlin", "swift", "scala", "r", "matlab",
        ],
    ),
    (
        "web_technologies",
        &[
            "html", "css", "react", "angular", "vue", "node.js", "express", "django", "flask",
            "spring", "laravel", "rails",
        ],
    ),
    (
        "databases",
        &[
            "mysql",
            "postgresql",
            "mongodb",
            "redis",
            "elasticsearch",
            "oracle",
            "sql server",
            "sqlite",
            "cassandra",
            "dynamodb",
        ],
    ),
    (
        "cloud_platforms",
        &[
            "aws",
            "azure",
            "gcp",
            "google cloud",
            "docker",
            "kubernetes",
            "terraform",
            "jenkins",
            "git",
            "ci/cd",
        ],
    ),
    (
        "data_science",
        &[
            "machine learning",
            "deep learning",
            "pandas",
            "numpy",
            "scikit-learn",
            "tensorflow",
            "pytorch",
            "tableau",
            "power bi",
            "spark",
        ],
    ),
    (
        "soft_skills",
        &[
            "communication",
            "leadership",
            "teamwork",
            "problem solving",
            "analytical thinking",
            "project management",
            "agile",
            "scrum",
        ],
    ),
];

/// Canonical skill name → common spelling variations.
/// Lookup is bidirectional: an alias also resolves back to its canonical
/// form and sibling aliases.
const SKILL_ALIASES: &[(&str, &[&str])] = &[
    ("javascript", &["js", "java script"]),
    ("typescript", &["ts"]),
    ("python", &["py"]),
    ("machine learning", &["ml", "machinelearning"]),
    ("artificial intelligence", &["ai"]),
    ("node.js", &["nodejs", "node"]),
    ("react.js", &["reactjs", "react"]),
    ("angular.js", &["angularjs", "angular"]),
    ("vue.js", &["vuejs", "vue"]),
    ("c++", &["cpp", "c plus plus"]),
    ("c#", &["csharp", "c sharp"]),
    ("sql server", &["sqlserver", "mssql"]),
    ("postgresql", &["postgres", "psql"]),
];

/// Requirement-language indicators around a skill mention.
pub const MUST_HAVE_INDICATORS: &[&str] =
    &["required", "essential", "must have", "mandatory", "minimum"];
pub const GOOD_TO_HAVE_INDICATORS: &[&str] =
    &["preferred", "nice to have", "plus", "bonus", "advantage"];

/// Education keywords scanned as qualification mentions.
pub const EDUCATION_KEYWORDS: &[&str] =
    &["bachelor", "master", "phd", "degree", "diploma", "certification"];

/// Returns the known spelling variations for a skill, including the skill
/// itself. The input is matched case-insensitively against both canonical
/// names and aliases.
pub fn skill_variations(skill: &str) -> Vec<String> {
    let skill_lower = skill.to_lowercase();
    let mut variations = vec![skill_lower.clone()];

    for (canonical, aliases) in SKILL_ALIASES {
        if *canonical == skill_lower {
            variations.extend(aliases.iter().map(|a| a.to_string()));
        } else if aliases.contains(&skill_lower.as_str()) {
            variations.push(canonical.to_string());
            variations.extend(aliases.iter().map(|a| a.to_string()));
        }
    }

    variations.sort();
    variations.dedup();
    variations
}
