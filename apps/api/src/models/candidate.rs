use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Candidate pipeline statuses, in funnel order.
pub const CANDIDATE_STATUSES: &[&str] = &[
    "new",
    "screening",
    "interviewed",
    "offered",
    "hired",
    "rejected",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linked_in: Option<String>,
    pub portfolio: Option<String>,
    pub resume_text: Option<String>,
    pub resume_key: Option<String>,
    pub cover_letter: Option<String>,
    pub source: Option<String>,
    pub job_posting_id: Uuid,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    pub years_experience: Option<i32>,
    pub expected_salary: Option<i32>,
    pub status: String,
    pub skills: Option<Value>,
    pub education: Option<Value>,
    pub ai_score: Option<f64>,
    pub ai_summary: Option<String>,
    pub ai_strengths: Option<Value>,
    pub ai_weaknesses: Option<Value>,
    pub ai_recommendation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateRow {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Minimal candidate reference embedded in interviews, notes and messages.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub current_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NoteRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    #[serde(rename = "type")]
    pub note_type: String,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningAnswerRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
    pub ai_score: Option<f64>,
    pub ai_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}
