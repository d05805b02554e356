// All LLM prompt constants for the analysis module.
// Each template documents its placeholders; replace them before sending.

/// System prompt for requirement extraction — enforces JSON-only output.
pub const EXTRACTION_SYSTEM: &str = "You are an expert HR analyst. \
    Extract structured information from job descriptions accurately and comprehensively. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Requirement extraction prompt template. Replace `{job_description}`.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and extract structured information.

Job Description:
{job_description}

Return a JSON object with this EXACT schema (no extra fields):
{
  "role_title": "extracted job title",
  "must_have_skills": ["skill1", "skill2"],
  "good_to_have_skills": ["skill1", "skill2"],
  "qualifications": ["qualification1", "qualification2"],
  "experience_required": "years of experience required",
  "key_responsibilities": ["responsibility1", "responsibility2"],
  "technologies": ["tech1", "tech2"],
  "soft_skills": ["skill1", "skill2"],
  "education_level": "minimum education requirement",
  "industry": "industry/domain",
  "employment_type": "full-time/part-time/contract/etc"
}

Be specific and extract actual skills, technologies, and requirements mentioned in the description.
Separate must-have from good-to-have based on language like "required", "essential" vs "preferred", "nice to have"."#;

/// System prompt for semantic similarity scoring.
pub const SIMILARITY_SYSTEM: &str = "You are a precise resume screening assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Semantic similarity prompt template.
/// Replace `{job_description}` and `{resume_text}`.
pub const SIMILARITY_PROMPT_TEMPLATE: &str = r#"Analyze the semantic similarity between the following resume and job description.
Provide a similarity score from 0-100 based on how well the candidate's background matches the job requirements.

Job Description:
{job_description}

Resume:
{resume_text}

Respond with a JSON object in this exact format:
{
  "similarity_score": 85,
  "explanation": "Brief explanation of the similarity assessment",
  "key_matches": ["match1", "match2"],
  "key_gaps": ["gap1", "gap2"]
}

Score should be 0-100 where:
- 90-100: Excellent match, candidate exceeds requirements
- 80-89: Very good match, candidate meets most requirements
- 70-79: Good match, candidate meets core requirements
- 60-69: Fair match, candidate meets some requirements
- 50-59: Poor match, significant gaps
- 0-49: Very poor match, major misalignment"#;

/// System prompt for the qualitative review.
pub const REVIEW_SYSTEM: &str = "You are an expert technical recruiter and HR analyst. \
    Provide detailed, honest, and constructive feedback about resume-job fit. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Qualitative review prompt template.
/// Replace `{job_description}`, `{resume_text}`, `{must_have_skills}`,
/// `{good_to_have_skills}`.
pub const REVIEW_PROMPT_TEMPLATE: &str = r#"Analyze the following resume against the job description and provide a comprehensive evaluation.

Job Description:
{job_description}

Resume:
{resume_text}

Required Skills: {must_have_skills}
Preferred Skills: {good_to_have_skills}

Provide a detailed analysis in JSON format:
{
  "score": 85,
  "confidence": 0.9,
  "missing_skills": ["skill1", "skill2"],
  "strengths": ["strength1", "strength2"],
  "weaknesses": ["weakness1", "weakness2"],
  "experience_match": "good/average/poor",
  "education_match": "good/average/poor",
  "overall_fit": "good/average/poor",
  "detailed_feedback": "Comprehensive feedback about the candidate's suitability...",
  "improvement_areas": ["area1", "area2"],
  "recommendation": "hire/interview/reject"
}

Score should be 0-100 based on overall fit for the role.
Be specific about missing skills and areas for improvement.
Provide actionable feedback that would help the candidate improve."#;
