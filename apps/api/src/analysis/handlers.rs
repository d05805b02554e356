use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::analysis::aggregate::AnalysisResult;
use crate::analysis::requirements::{
    extract_experience_years, extract_keywords, StructuredRequirements,
};
use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::models::job::JobRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
}

/// POST /api/v1/jobs
/// Runs the requirement extractor once and persists the job with its
/// structured requirements and display keywords.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<Json<JobRow>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("job title must not be empty".into()));
    }
    if req.description.trim().is_empty() {
        return Err(AppError::Validation(
            "job description must not be empty".into(),
        ));
    }

    let requirements = state.extractor.extract(&req.description).await;
    let keywords = extract_keywords(&req.description);

    let job: JobRow = sqlx::query_as(
        r#"
        INSERT INTO jobs (id, title, description, requirements, keywords, created_at)
        VALUES ($1, $2, $3, $4, $5, now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.title.trim())
    .bind(&req.description)
    .bind(serde_json::to_value(&requirements).map_err(anyhow::Error::from)?)
    .bind(&keywords)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(job))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(fetch_job(&state.db, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_filename: String,
    pub resume_text: String,
}

/// POST /api/v1/jobs/:id/analyses
/// Scores one resume against the job. Empty resume text is rejected here,
/// before the scoring core runs.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisRow>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "resume text must not be empty".into(),
        ));
    }

    let job = fetch_job(&state.db, job_id).await?;
    let requirements = job_requirements(&job)?;

    let result = state
        .engine
        .analyze(&req.resume_text, &job.description, &requirements)
        .await;

    let row = insert_analysis(&state.db, job_id, &req, &result).await?;
    Ok(Json(row))
}

#[derive(Debug, Deserialize)]
pub struct BatchAnalyzeRequest {
    pub resumes: Vec<AnalyzeRequest>,
}

#[derive(Debug, Serialize)]
pub struct BatchAnalyzeResponse {
    pub analyses: Vec<AnalysisRow>,
}

/// POST /api/v1/jobs/:id/analyses/batch
/// Fans the batch out under the configured concurrency cap; results come
/// back in input order, one row per submitted resume.
pub async fn handle_analyze_batch(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<BatchAnalyzeRequest>,
) -> Result<Json<BatchAnalyzeResponse>, AppError> {
    if req.resumes.is_empty() {
        return Err(AppError::Validation(
            "batch must contain at least one resume".into(),
        ));
    }

    let job = fetch_job(&state.db, job_id).await?;
    let requirements = job_requirements(&job)?;

    let texts: Vec<String> = req.resumes.iter().map(|r| r.resume_text.clone()).collect();
    let results = state
        .engine
        .analyze_batch(
            &texts,
            &job.description,
            &requirements,
            state.config.max_concurrent_analyses,
        )
        .await;

    let mut analyses = Vec::with_capacity(results.len());
    for (submission, result) in req.resumes.iter().zip(&results) {
        analyses.push(insert_analysis(&state.db, job_id, submission, result).await?);
    }

    Ok(Json(BatchAnalyzeResponse { analyses }))
}

#[derive(Debug, Deserialize)]
pub struct ListAnalysesQuery {
    /// Minimum relevance score filter, used by downstream notification readers.
    pub min_score: Option<f64>,
}

/// GET /api/v1/jobs/:id/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<ListAnalysesQuery>,
) -> Result<Json<Vec<AnalysisRow>>, AppError> {
    // 404 on unknown job rather than an empty list
    fetch_job(&state.db, job_id).await?;

    let rows: Vec<AnalysisRow> = sqlx::query_as(
        r#"
        SELECT * FROM analyses
        WHERE job_id = $1 AND relevance_score >= $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(job_id)
    .bind(params.min_score.unwrap_or(0.0))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}

async fn fetch_job(db: &PgPool, id: Uuid) -> Result<JobRow, AppError> {
    let job: Option<JobRow> = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    job.ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

fn job_requirements(job: &JobRow) -> Result<StructuredRequirements, AppError> {
    serde_json::from_value(job.requirements.clone())
        .map_err(|e| AppError::Internal(anyhow::Error::from(e)))
}

async fn insert_analysis(
    db: &PgPool,
    job_id: Uuid,
    submission: &AnalyzeRequest,
    result: &AnalysisResult,
) -> Result<AnalysisRow, AppError> {
    let candidate_name = extract_candidate_name(&submission.resume_text);
    let experience_years =
        extract_experience_years(&submission.resume_text.to_lowercase()).unwrap_or(0) as i32;

    let row: AnalysisRow = sqlx::query_as(
        r#"
        INSERT INTO analyses
            (id, job_id, resume_filename, candidate_name, experience_years,
             relevance_score, verdict, result, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(&submission.resume_filename)
    .bind(candidate_name)
    .bind(experience_years)
    .bind(result.relevance_score)
    .bind(result.verdict.as_str())
    .bind(serde_json::to_value(result).map_err(anyhow::Error::from)?)
    .fetch_one(db)
    .await?;

    Ok(row)
}

/// Guesses the candidate name from the first lines of resume text: a line of
/// 2-4 title-case words within the first five lines, else "Unknown Candidate".
fn extract_candidate_name(resume_text: &str) -> String {
    for line in resume_text.lines().take(5) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lowered = line.to_lowercase();
        if ["resume", "cv", "curriculum vitae"].contains(&lowered.as_str()) {
            continue;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        if (2..=4).contains(&words.len()) && words.iter().all(|w| is_title_case(w)) {
            return line.to_string();
        }
    }
    "Unknown Candidate".to_string()
}

fn is_title_case(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.all(|c| c.is_lowercase()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_name_from_first_line() {
        let text = "Jane Doe\nSenior Engineer\njane@example.com";
        assert_eq!(extract_candidate_name(text), "Jane Doe");
    }

    #[test]
    fn test_candidate_name_skips_resume_header() {
        let text = "Resume\n\nJohn Albert Smith\nBackend Developer";
        assert_eq!(extract_candidate_name(text), "John Albert Smith");
    }

    #[test]
    fn test_candidate_name_rejects_all_caps_and_long_lines() {
        let text = "JANE DOE\nA very long headline that is not a name at all here";
        assert_eq!(extract_candidate_name(text), "Unknown Candidate");
    }

    #[test]
    fn test_candidate_name_only_scans_first_five_lines() {
        let text = "one\ntwo\nthree\nfour\nfive\nJane Doe";
        assert_eq!(extract_candidate_name(text), "Unknown Candidate");
    }

    #[test]
    fn test_is_title_case() {
        assert!(is_title_case("Jane"));
        assert!(!is_title_case("JANE"));
        assert!(!is_title_case("jane"));
        assert!(!is_title_case("McDonald"));
        assert!(!is_title_case(""));
    }

    #[test]
    fn test_analyze_request_deserializes() {
        let req: AnalyzeRequest = serde_json::from_str(
            r#"{"resume_filename": "jane.pdf", "resume_text": "Jane Doe\npython"}"#,
        )
        .unwrap();
        assert_eq!(req.resume_filename, "jane.pdf");
    }
}
