use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

pub const COMMUNICATION_TYPES: &[&str] = &["email", "sms", "call", "note"];
pub const COMMUNICATION_DIRECTIONS: &[&str] = &["inbound", "outbound"];
pub const COMMUNICATION_STATUSES: &[&str] = &["draft", "sent", "delivered", "read", "failed"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub user_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub comm_type: String,
    pub direction: String,
    pub subject: Option<String>,
    pub content: String,
    pub status: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplateRow {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub body: String,
    #[serde(rename = "type")]
    pub template_type: String,
    pub variables: Option<Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
