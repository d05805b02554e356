use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting with its extracted requirements.
/// `requirements` holds the `StructuredRequirements` object as JSONB; it is
/// written once at creation and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Value,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}
