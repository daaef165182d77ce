use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStageRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    #[serde(rename = "order")]
    pub position: i32,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}
