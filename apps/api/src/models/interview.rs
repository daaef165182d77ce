use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

pub const INTERVIEW_TYPES: &[&str] = &["phone", "video", "onsite", "technical"];
pub const INTERVIEW_STATUSES: &[&str] = &["scheduled", "completed", "cancelled", "no_show"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub interviewer_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration: i32,
    #[serde(rename = "type")]
    pub interview_type: String,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub overall_rating: Option<i32>,
    pub technical_score: Option<i32>,
    pub cultural_score: Option<i32>,
    pub feedback: Option<String>,
    pub ai_questions: Option<Value>,
    pub ai_summary: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
