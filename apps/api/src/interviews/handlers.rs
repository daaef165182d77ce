//! Axum route handlers for the Interviews API.

use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::ai::models::{CandidateProfile, InterviewQuestionSet, InterviewRatings};
use crate::ai::service::{generate_interview_questions, summarize_interview};
use crate::auth::AuthUser;
use crate::candidates::queries::require_candidate;
use crate::dates::{optional_bound, Bound};
use crate::db::non_blank;
use crate::errors::{ensure_one_of, AppError};
use crate::extract::{Json, Path, Query};
use crate::jobs::queries::find_job;
use crate::models::candidate::{CandidateRow, CandidateSummary};
use crate::models::interview::{InterviewRow, INTERVIEW_STATUSES, INTERVIEW_TYPES};
use crate::models::job::JobPostingRow;
use crate::models::user::UserSummary;
use crate::relations::{candidate_summaries, user_summaries};
use crate::serde_ext::optional_int;
use crate::state::AppState;

const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

/// Fields left out of a feedback body keep their stored value. The AI summary
/// is always replaced, cleared when there was nothing to summarize.
const FEEDBACK_UPDATE: &str = r#"
    UPDATE interviews SET
        notes           = COALESCE($2, notes),
        overall_rating  = COALESCE($3, overall_rating),
        technical_score = COALESCE($4, technical_score),
        cultural_score  = COALESCE($5, cultural_score),
        feedback        = COALESCE($6, feedback),
        ai_summary      = $7,
        status          = 'completed',
        updated_at      = now()
    WHERE id = $1
    RETURNING *
"#;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFilters {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub interview_type: Option<String>,
    pub candidate_id: Option<Uuid>,
    pub interviewer_id: Option<Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    pub candidate_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "optional_int")]
    pub duration: Option<i32>,
    #[serde(rename = "type")]
    pub interview_type: Option<String>,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInterviewRequest {
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_int")]
    pub duration: Option<i32>,
    #[serde(rename = "type")]
    pub interview_type: Option<String>,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "optional_int")]
    pub overall_rating: Option<i32>,
    #[serde(default, deserialize_with = "optional_int")]
    pub technical_score: Option<i32>,
    #[serde(default, deserialize_with = "optional_int")]
    pub cultural_score: Option<i32>,
    pub feedback: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequest {
    pub interview_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "optional_int")]
    pub overall_rating: Option<i32>,
    #[serde(default, deserialize_with = "optional_int")]
    pub technical_score: Option<i32>,
    #[serde(default, deserialize_with = "optional_int")]
    pub cultural_score: Option<i32>,
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InterviewWithPeople {
    #[serde(flatten)]
    pub interview: InterviewRow,
    pub candidate: Option<CandidateSummary>,
    pub interviewer: Option<UserSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateWithJobPosting {
    #[serde(flatten)]
    pub candidate: CandidateRow,
    pub job_posting: Option<JobPostingRow>,
}

#[derive(Debug, Serialize)]
pub struct InterviewDetail {
    #[serde(flatten)]
    pub interview: InterviewRow,
    pub candidate: CandidateWithJobPosting,
    pub interviewer: Option<UserSummary>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<InterviewFilters>,
) -> Result<Json<Vec<InterviewWithPeople>>, AppError> {
    let start = optional_bound("startDate", filters.start_date.as_deref(), Bound::Start)?;
    let end = optional_bound("endDate", filters.end_date.as_deref(), Bound::End)?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM interviews WHERE TRUE");
    if let Some(status) = non_blank(&filters.status) {
        qb.push(" AND status = ").push_bind(status.to_string());
    }
    if let Some(kind) = non_blank(&filters.interview_type) {
        qb.push(" AND interview_type = ").push_bind(kind.to_string());
    }
    if let Some(candidate_id) = filters.candidate_id {
        qb.push(" AND candidate_id = ").push_bind(candidate_id);
    }
    if let Some(interviewer_id) = filters.interviewer_id {
        qb.push(" AND interviewer_id = ").push_bind(interviewer_id);
    }
    if let Some(start) = start {
        qb.push(" AND scheduled_at >= ").push_bind(start);
    }
    if let Some(end) = end {
        qb.push(" AND scheduled_at <= ").push_bind(end);
    }
    qb.push(" ORDER BY scheduled_at ASC");

    let interviews = qb
        .build_query_as::<InterviewRow>()
        .fetch_all(&state.db)
        .await?;

    Ok(Json(attach_people(&state.db, interviews).await?))
}

/// GET /api/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewDetail>, AppError> {
    let interview = require_interview(&state.db, id).await?;
    let candidate = require_candidate(&state.db, interview.candidate_id).await?;
    let job_posting = find_job(&state.db, candidate.job_posting_id).await?;
    let mut users = user_summaries(&state.db, [interview.interviewer_id]).await?;

    Ok(Json(InterviewDetail {
        interviewer: users.remove(&interview.interviewer_id),
        candidate: CandidateWithJobPosting {
            candidate,
            job_posting,
        },
        interview,
    }))
}

/// POST /api/interviews
///
/// Schedules an interview with the caller as interviewer and moves the
/// candidate to `interviewed` in the same transaction.
pub async fn handle_create_interview(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateInterviewRequest>,
) -> Result<(StatusCode, Json<InterviewWithPeople>), AppError> {
    let interview_type = req.interview_type.unwrap_or_else(|| "video".to_string());
    ensure_one_of("type", &interview_type, INTERVIEW_TYPES)?;
    let duration = req.duration.unwrap_or(60);
    validate_duration(duration)?;
    require_candidate(&state.db, req.candidate_id).await?;

    let mut tx = state.db.begin().await?;

    let interview = sqlx::query_as::<_, InterviewRow>(
        r#"
        INSERT INTO interviews
            (candidate_id, interviewer_id, scheduled_at, duration, interview_type,
             location, meeting_link, notes, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'scheduled')
        RETURNING *
        "#,
    )
    .bind(req.candidate_id)
    .bind(user.id)
    .bind(req.scheduled_at)
    .bind(duration)
    .bind(&interview_type)
    .bind(req.location)
    .bind(req.meeting_link)
    .bind(req.notes)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE candidates SET status = 'interviewed', updated_at = now() WHERE id = $1")
        .bind(req.candidate_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        "Interview {} scheduled for candidate {} at {}",
        interview.id,
        interview.candidate_id,
        interview.scheduled_at
    );

    let mut rows = attach_people(&state.db, vec![interview]).await?;
    let body = rows
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("created interview vanished")))?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// PUT /api/interviews/:id
///
/// Absent fields keep their stored value.
pub async fn handle_update_interview(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateInterviewRequest>,
) -> Result<Json<InterviewWithPeople>, AppError> {
    if let Some(status) = &req.status {
        ensure_one_of("status", status, INTERVIEW_STATUSES)?;
    }
    if let Some(kind) = &req.interview_type {
        ensure_one_of("type", kind, INTERVIEW_TYPES)?;
    }
    if let Some(duration) = req.duration {
        validate_duration(duration)?;
    }
    validate_ratings(req.overall_rating, req.technical_score, req.cultural_score)?;

    let interview = sqlx::query_as::<_, InterviewRow>(
        r#"
        UPDATE interviews SET
            scheduled_at    = COALESCE($2, scheduled_at),
            duration        = COALESCE($3, duration),
            interview_type  = COALESCE($4, interview_type),
            location        = COALESCE($5, location),
            meeting_link    = COALESCE($6, meeting_link),
            notes           = COALESCE($7, notes),
            status          = COALESCE($8, status),
            overall_rating  = COALESCE($9, overall_rating),
            technical_score = COALESCE($10, technical_score),
            cultural_score  = COALESCE($11, cultural_score),
            feedback        = COALESCE($12, feedback),
            updated_at      = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(req.scheduled_at)
    .bind(req.duration)
    .bind(req.interview_type)
    .bind(req.location)
    .bind(req.meeting_link)
    .bind(req.notes)
    .bind(req.status)
    .bind(req.overall_rating)
    .bind(req.technical_score)
    .bind(req.cultural_score)
    .bind(req.feedback)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| not_found(id))?;

    let mut rows = attach_people(&state.db, vec![interview]).await?;
    rows.pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("updated interview vanished")))
}

/// DELETE /api/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM interviews WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(Json(json!({ "message": "Interview deleted successfully" })))
}

/// POST /api/interviews/:id/ai/generate-questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<GenerateQuestionsRequest>>,
) -> Result<Json<InterviewQuestionSet>, AppError> {
    let requested_type = body.and_then(|Json(b)| b.interview_type);

    let interview = require_interview(&state.db, id).await?;
    let candidate = require_candidate(&state.db, interview.candidate_id).await?;
    let job = find_job(&state.db, candidate.job_posting_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", candidate.job_posting_id)))?;

    let interview_type = requested_type
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| interview.interview_type.clone());

    let questions = generate_interview_questions(
        &state.llm,
        &candidate_profile(&candidate),
        &job.description,
        &interview_type,
    )
    .await?;

    let stored = serde_json::to_value(&questions.questions)
        .map_err(|e| AppError::Internal(e.into()))?;
    sqlx::query("UPDATE interviews SET ai_questions = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(stored)
        .execute(&state.db)
        .await?;

    tracing::info!(
        "Generated {} {interview_type} questions for interview {id}",
        questions.questions.len()
    );
    Ok(Json(questions))
}

/// POST /api/interviews/:id/feedback
///
/// Records ratings and notes, summarizes them with the AI when there is
/// text to summarize, and marks the interview completed.
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<InterviewWithPeople>, AppError> {
    validate_ratings(req.overall_rating, req.technical_score, req.cultural_score)?;
    require_interview(&state.db, id).await?;

    let summary_source = req
        .notes
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| req.feedback.as_deref().filter(|f| !f.trim().is_empty()));

    let ai_summary = match summary_source {
        Some(text) => {
            let ratings = InterviewRatings {
                overall_rating: req.overall_rating,
                technical_score: req.technical_score,
                cultural_score: req.cultural_score,
            };
            let summary = summarize_interview(&state.llm, text, &ratings).await?;
            Some(serde_json::to_value(summary).map_err(|e| AppError::Internal(e.into()))?)
        }
        None => None,
    };

    let interview = sqlx::query_as::<_, InterviewRow>(FEEDBACK_UPDATE)
        .bind(id)
        .bind(req.notes)
        .bind(req.overall_rating)
        .bind(req.technical_score)
        .bind(req.cultural_score)
        .bind(req.feedback)
        .bind(ai_summary)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!("Feedback recorded for interview {id}");

    let mut rows = attach_people(&state.db, vec![interview]).await?;
    rows.pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("completed interview vanished")))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Interview {id} not found"))
}

async fn require_interview(pool: &PgPool, id: Uuid) -> Result<InterviewRow, AppError> {
    sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn attach_people(
    pool: &PgPool,
    interviews: Vec<InterviewRow>,
) -> Result<Vec<InterviewWithPeople>, AppError> {
    let candidates = candidate_summaries(pool, interviews.iter().map(|i| i.candidate_id)).await?;
    let users = user_summaries(pool, interviews.iter().map(|i| i.interviewer_id)).await?;
    Ok(interviews
        .into_iter()
        .map(|interview| InterviewWithPeople {
            candidate: candidates.get(&interview.candidate_id).cloned(),
            interviewer: users.get(&interview.interviewer_id).cloned(),
            interview,
        })
        .collect())
}

fn candidate_profile(candidate: &CandidateRow) -> CandidateProfile {
    CandidateProfile {
        name: candidate.full_name(),
        title: candidate.current_title.clone(),
        company: candidate.current_company.clone(),
        experience: candidate.years_experience,
        skills: candidate.skills.clone(),
        summary: candidate.ai_summary.clone(),
    }
}

fn validate_duration(minutes: i32) -> Result<(), AppError> {
    if (1..=24 * 60).contains(&minutes) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "duration must be between 1 and 1440 minutes".to_string(),
        ))
    }
}

fn validate_ratings(
    overall: Option<i32>,
    technical: Option<i32>,
    cultural: Option<i32>,
) -> Result<(), AppError> {
    for (field, value) in [
        ("overallRating", overall),
        ("technicalScore", technical),
        ("culturalScore", cultural),
    ] {
        if let Some(v) = value {
            if !RATING_RANGE.contains(&v) {
                return Err(AppError::Validation(format!("{field} must be between 1 and 5")));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ratings() {
        assert!(validate_ratings(Some(5), None, Some(1)).is_ok());
        assert!(validate_ratings(Some(0), None, None).is_err());
        assert!(validate_ratings(None, Some(6), None).is_err());
    }

    #[test]
    fn test_validate_duration() {
        assert!(validate_duration(45).is_ok());
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(2000).is_err());
    }

    #[test]
    fn test_filters_parse_camel_case() {
        let id = Uuid::new_v4();
        let filters: InterviewFilters = serde_json::from_value(json!({
            "type": "technical",
            "candidateId": id,
            "startDate": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(filters.interview_type.as_deref(), Some("technical"));
        assert_eq!(filters.candidate_id, Some(id));
        assert_eq!(filters.start_date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_create_request_requires_timestamp() {
        let err = serde_json::from_value::<CreateInterviewRequest>(json!({
            "candidateId": Uuid::new_v4(),
            "scheduledAt": "next tuesday"
        }));
        assert!(err.is_err());
    }

    #[test]
    fn test_partial_feedback_keeps_stored_fields() {
        let req: FeedbackRequest =
            serde_json::from_value(json!({"feedback": "good", "overallRating": 4})).unwrap();
        assert!(req.notes.is_none());
        assert!(req.technical_score.is_none());

        let assignments: Vec<&str> = FEEDBACK_UPDATE
            .lines()
            .map(str::trim)
            .filter(|l| l.contains('='))
            .collect();
        for column in ["notes", "overall_rating", "technical_score", "cultural_score", "feedback"] {
            let line = assignments
                .iter()
                .find(|l| l.split_whitespace().next() == Some(column))
                .unwrap();
            assert!(
                line.contains("COALESCE($") && line.ends_with(&format!(", {column}),")),
                "{column} must fall back to its stored value: {line}"
            );
        }
        assert!(assignments.iter().any(|l| l.starts_with("status") && l.contains("'completed'")));
    }
}
