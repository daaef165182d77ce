//! Axum route handlers for the candidate message log and AI drafted email.

use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::ai::models::GeneratedEmail;
use crate::ai::service::{generate_email, EmailRecipient};
use crate::auth::AuthUser;
use crate::candidates::queries::require_candidate;
use crate::db::non_blank;
use crate::errors::{ensure_one_of, require_non_empty, AppError};
use crate::extract::{Json, Path, Query};
use crate::jobs::queries::find_job;
use crate::models::candidate::{CandidateRow, CandidateSummary};
use crate::models::communication::{
    CommunicationRow, COMMUNICATION_DIRECTIONS, COMMUNICATION_STATUSES, COMMUNICATION_TYPES,
};
use crate::models::user::UserSummary;
use crate::relations::{candidate_summaries, user_summaries};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationFilters {
    pub candidate_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub comm_type: Option<String>,
    pub direction: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunicationRequest {
    pub candidate_id: Uuid,
    #[serde(rename = "type")]
    pub comm_type: Option<String>,
    pub direction: Option<String>,
    pub subject: Option<String>,
    pub content: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateEmailRequest {
    pub candidate_id: Uuid,
    pub template_type: String,
    pub custom_context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommunicationWithPeople {
    #[serde(flatten)]
    pub communication: CommunicationRow,
    pub candidate: Option<CandidateSummary>,
    pub user: Option<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct CommunicationDetail {
    #[serde(flatten)]
    pub communication: CommunicationRow,
    pub candidate: CandidateRow,
    pub user: Option<UserSummary>,
}

/// GET /api/communications
pub async fn handle_list_communications(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<CommunicationFilters>,
) -> Result<Json<Vec<CommunicationWithPeople>>, AppError> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM communications WHERE TRUE");
    if let Some(candidate_id) = filters.candidate_id {
        qb.push(" AND candidate_id = ").push_bind(candidate_id);
    }
    if let Some(kind) = non_blank(&filters.comm_type) {
        qb.push(" AND comm_type = ").push_bind(kind.to_string());
    }
    if let Some(direction) = non_blank(&filters.direction) {
        qb.push(" AND direction = ").push_bind(direction.to_string());
    }
    qb.push(" ORDER BY created_at DESC");

    let rows = qb
        .build_query_as::<CommunicationRow>()
        .fetch_all(&state.db)
        .await?;
    Ok(Json(attach_people(&state.db, rows).await?))
}

/// GET /api/communications/:id
pub async fn handle_get_communication(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CommunicationDetail>, AppError> {
    let communication =
        sqlx::query_as::<_, CommunicationRow>("SELECT * FROM communications WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Communication {id} not found")))?;

    let candidate = require_candidate(&state.db, communication.candidate_id).await?;
    let user = match communication.user_id {
        Some(user_id) => user_summaries(&state.db, [user_id]).await?.remove(&user_id),
        None => None,
    };

    Ok(Json(CommunicationDetail {
        communication,
        candidate,
        user,
    }))
}

/// POST /api/communications
///
/// Logs a message against a candidate. `sentAt` is stamped only for `sent`.
pub async fn handle_create_communication(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateCommunicationRequest>,
) -> Result<(StatusCode, Json<CommunicationWithPeople>), AppError> {
    require_non_empty("content", &req.content)?;
    let comm_type = req.comm_type.unwrap_or_else(|| "email".to_string());
    let direction = req.direction.unwrap_or_else(|| "outbound".to_string());
    let status = req.status.unwrap_or_else(|| "sent".to_string());
    ensure_one_of("type", &comm_type, COMMUNICATION_TYPES)?;
    ensure_one_of("direction", &direction, COMMUNICATION_DIRECTIONS)?;
    ensure_one_of("status", &status, COMMUNICATION_STATUSES)?;
    require_candidate(&state.db, req.candidate_id).await?;

    let sent_at = (status == "sent").then(Utc::now);

    let communication = sqlx::query_as::<_, CommunicationRow>(
        r#"
        INSERT INTO communications
            (candidate_id, user_id, comm_type, direction, subject, content, status, sent_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(req.candidate_id)
    .bind(user.id)
    .bind(&comm_type)
    .bind(&direction)
    .bind(req.subject)
    .bind(&req.content)
    .bind(&status)
    .bind(sent_at)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(
        "Logged {comm_type} ({direction}, {status}) for candidate {}",
        communication.candidate_id
    );

    let mut rows = attach_people(&state.db, vec![communication]).await?;
    let body = rows
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("created communication vanished")))?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// POST /api/communications/ai/generate-email
pub async fn handle_generate_email(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<GenerateEmailRequest>,
) -> Result<Json<GeneratedEmail>, AppError> {
    require_non_empty("templateType", &req.template_type)?;
    let candidate = require_candidate(&state.db, req.candidate_id).await?;
    let job = find_job(&state.db, candidate.job_posting_id).await?;

    let recipient = EmailRecipient {
        first_name: &candidate.first_name,
        last_name: &candidate.last_name,
        position: job.as_ref().map(|j| j.title.as_str()),
    };
    let email = generate_email(
        &state.llm,
        req.template_type.trim(),
        &recipient,
        req.custom_context.as_deref(),
    )
    .await?;
    Ok(Json(email))
}

async fn attach_people(
    pool: &PgPool,
    rows: Vec<CommunicationRow>,
) -> Result<Vec<CommunicationWithPeople>, AppError> {
    let candidates = candidate_summaries(pool, rows.iter().map(|c| c.candidate_id)).await?;
    let users = user_summaries(pool, rows.iter().filter_map(|c| c.user_id)).await?;
    Ok(rows
        .into_iter()
        .map(|communication| CommunicationWithPeople {
            candidate: candidates.get(&communication.candidate_id).cloned(),
            user: communication
                .user_id
                .and_then(|id| users.get(&id).cloned())
                .map(UserSummary::without_email),
            communication,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults_are_optional() {
        let req: CreateCommunicationRequest = serde_json::from_value(json!({
            "candidateId": Uuid::new_v4(),
            "content": "Thanks for applying"
        }))
        .unwrap();
        assert!(req.comm_type.is_none());
        assert!(req.direction.is_none());
        assert!(req.status.is_none());
    }

    #[test]
    fn test_with_people_wire_shape() {
        let row = CommunicationWithPeople {
            communication: CommunicationRow {
                id: Uuid::new_v4(),
                candidate_id: Uuid::new_v4(),
                user_id: None,
                comm_type: "email".into(),
                direction: "outbound".into(),
                subject: Some("Hello".into()),
                content: "Body".into(),
                status: "draft".into(),
                sent_at: None,
                created_at: Utc::now(),
            },
            candidate: None,
            user: None,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["type"], "email");
        assert!(value["sentAt"].is_null());
        assert!(value["user"].is_null());
    }
}
