use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One analysis of a resume against a job, keyed by (job_id, resume_filename).
/// `result` holds the full `AnalysisResult` as JSONB; score and verdict are
/// denormalized for listing and threshold filters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub resume_filename: String,
    pub candidate_name: String,
    /// Years of experience parsed from the resume text, 0 when absent.
    pub experience_years: i32,
    pub relevance_score: f64,
    pub verdict: String,
    pub result: Value,
    pub created_at: DateTime<Utc>,
}
