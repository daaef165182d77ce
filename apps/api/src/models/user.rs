use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const USER_ROLES: &[&str] = &["admin", "recruiter", "hiring_manager", "interviewer"];

/// Full user row, including the password hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        User {
            id: r.id,
            email: r.email,
            first_name: r.first_name,
            last_name: r.last_name,
            role: r.role,
            avatar: r.avatar,
            created_at: r.created_at,
        }
    }
}

/// Name-only reference embedded in other resources (creator, author, interviewer).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserSummary {
    /// Drops the e-mail for listings that only show names.
    pub fn without_email(mut self) -> Self {
        self.email = None;
        self
    }
}
