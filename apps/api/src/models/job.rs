use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

pub const JOB_STATUSES: &[&str] = &["draft", "active", "paused", "closed"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobPostingRow {
    pub id: Uuid,
    pub title: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub description: String,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub status: String,
    pub created_by_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningQuestionRow {
    pub id: Uuid,
    pub job_posting_id: Uuid,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub options: Option<Value>,
    pub weight: i32,
    #[serde(rename = "order")]
    pub position: i32,
    pub required: bool,
    pub ai_generated: bool,
    pub created_at: DateTime<Utc>,
}

/// Job reference embedded in candidate listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub department: String,
}
