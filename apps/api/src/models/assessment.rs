use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

pub const ASSESSMENT_TYPES: &[&str] = &["technical", "personality", "cognitive", "skills"];
pub const ASSESSMENT_STATUSES: &[&str] = &["pending", "in_progress", "completed", "expired"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub assessment_type: String,
    pub status: String,
    pub score: Option<i32>,
    pub max_score: Option<i32>,
    pub time_limit: i32,
    pub duration: Option<i32>,
    pub questions: Option<Value>,
    pub answers: Option<Value>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
