//! Axum route handlers for the Assessments API.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::ai::models::GeneratedAssessment;
use crate::ai::service::generate_assessment;
use crate::assessments::scoring::{score_answers, MAX_SCORE};
use crate::auth::AuthUser;
use crate::candidates::queries::require_candidate;
use crate::dates::rounded_minutes;
use crate::db::non_blank;
use crate::errors::{ensure_one_of, require_non_empty, AppError};
use crate::extract::{Json, Path, Query};
use crate::jobs::queries::find_job;
use crate::models::assessment::{AssessmentRow, ASSESSMENT_STATUSES, ASSESSMENT_TYPES};
use crate::models::candidate::{CandidateRow, CandidateSummary};
use crate::models::job::{JobPostingRow, JobSummary};
use crate::relations::{candidate_summaries, job_summaries};
use crate::serde_ext::optional_int;
use crate::state::AppState;

const DIFFICULTIES: &[&str] = &["easy", "medium", "hard"];

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentFilters {
    pub candidate_id: Option<Uuid>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub assessment_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    pub candidate_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub assessment_type: Option<String>,
    #[serde(default, deserialize_with = "optional_int")]
    pub time_limit: Option<i32>,
    pub questions: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAssessmentRequest {
    pub candidate_id: Uuid,
    #[serde(rename = "type")]
    pub assessment_type: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAssessmentRequest {
    #[serde(default)]
    pub answers: Vec<Option<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRef {
    #[serde(flatten)]
    pub candidate: CandidateSummary,
    pub job_posting: Option<JobSummary>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentWithCandidate {
    #[serde(flatten)]
    pub assessment: AssessmentRow,
    pub candidate: Option<CandidateRef>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateWithJobPosting {
    #[serde(flatten)]
    pub candidate: CandidateRow,
    pub job_posting: Option<JobPostingRow>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentDetail {
    #[serde(flatten)]
    pub assessment: AssessmentRow,
    pub candidate: CandidateWithJobPosting,
}

#[derive(Debug, Serialize)]
pub struct GenerateAssessmentResponse {
    pub assessment: AssessmentWithCandidate,
    pub generated: GeneratedAssessment,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/assessments
pub async fn handle_list_assessments(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<AssessmentFilters>,
) -> Result<Json<Vec<AssessmentWithCandidate>>, AppError> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM assessments WHERE TRUE");
    if let Some(candidate_id) = filters.candidate_id {
        qb.push(" AND candidate_id = ").push_bind(candidate_id);
    }
    if let Some(status) = non_blank(&filters.status) {
        ensure_one_of("status", status, ASSESSMENT_STATUSES)?;
        qb.push(" AND status = ").push_bind(status.to_string());
    }
    if let Some(kind) = non_blank(&filters.assessment_type) {
        qb.push(" AND assessment_type = ").push_bind(kind.to_string());
    }
    qb.push(" ORDER BY created_at DESC");

    let rows = qb
        .build_query_as::<AssessmentRow>()
        .fetch_all(&state.db)
        .await?;
    Ok(Json(attach_candidates(&state.db, rows).await?))
}

/// GET /api/assessments/:id
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssessmentDetail>, AppError> {
    let assessment = require_assessment(&state.db, id).await?;
    let candidate = require_candidate(&state.db, assessment.candidate_id).await?;
    let job_posting = find_job(&state.db, candidate.job_posting_id).await?;

    Ok(Json(AssessmentDetail {
        assessment,
        candidate: CandidateWithJobPosting {
            candidate,
            job_posting,
        },
    }))
}

/// POST /api/assessments
pub async fn handle_create_assessment(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentWithCandidate>), AppError> {
    require_non_empty("name", &req.name)?;
    let assessment_type = req.assessment_type.unwrap_or_else(|| "technical".to_string());
    ensure_one_of("type", &assessment_type, ASSESSMENT_TYPES)?;
    let time_limit = req.time_limit.unwrap_or(60);
    validate_time_limit(time_limit)?;
    if let Some(questions) = &req.questions {
        if !questions.is_array() {
            return Err(AppError::Validation("questions must be an array".to_string()));
        }
    }
    require_candidate(&state.db, req.candidate_id).await?;

    let assessment = insert_assessment(
        &state.db,
        req.candidate_id,
        req.name.trim(),
        &assessment_type,
        time_limit,
        req.questions,
    )
    .await?;

    let body = with_candidate(&state.db, assessment).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// POST /api/assessments/ai/generate
///
/// Generates questions for the candidate's job and stores them as a pending assessment.
pub async fn handle_generate_assessment(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<GenerateAssessmentRequest>,
) -> Result<(StatusCode, Json<GenerateAssessmentResponse>), AppError> {
    let assessment_type = req.assessment_type.unwrap_or_else(|| "technical".to_string());
    ensure_one_of("type", &assessment_type, ASSESSMENT_TYPES)?;
    let difficulty = req.difficulty.unwrap_or_else(|| "medium".to_string());
    ensure_one_of("difficulty", &difficulty, DIFFICULTIES)?;

    let candidate = require_candidate(&state.db, req.candidate_id).await?;
    let job = find_job(&state.db, candidate.job_posting_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", candidate.job_posting_id)))?;

    let skills = skills_text(candidate.skills.as_ref());
    let generated = generate_assessment(
        &state.llm,
        &assessment_type,
        &job.title,
        skills.as_deref(),
        &difficulty,
    )
    .await?;

    let name = if generated.title.trim().is_empty() {
        format!("{} Assessment", job.title)
    } else {
        generated.title.trim().to_string()
    };
    let time_limit = generated
        .time_limit
        .filter(|t| validate_time_limit(*t).is_ok())
        .unwrap_or(60);
    let questions =
        serde_json::to_value(&generated.questions).map_err(|e| AppError::Internal(e.into()))?;

    let assessment = insert_assessment(
        &state.db,
        candidate.id,
        &name,
        &assessment_type,
        time_limit,
        Some(questions),
    )
    .await?;

    tracing::info!(
        "Generated {difficulty} {assessment_type} assessment {} with {} questions",
        assessment.id,
        generated.questions.len()
    );

    let assessment = with_candidate(&state.db, assessment).await?;
    Ok((
        StatusCode::CREATED,
        Json(GenerateAssessmentResponse {
            assessment,
            generated,
        }),
    ))
}

/// POST /api/assessments/:id/start
pub async fn handle_start_assessment(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssessmentRow>, AppError> {
    let current = require_assessment(&state.db, id).await?;
    if current.status == "completed" {
        return Err(AppError::Conflict("Assessment already completed".to_string()));
    }

    let assessment = sqlx::query_as::<_, AssessmentRow>(
        r#"
        UPDATE assessments SET status = 'in_progress', started_at = now(), updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| not_found(id))?;

    Ok(Json(assessment))
}

/// POST /api/assessments/:id/submit
///
/// Grades the answers, records how long the candidate took and completes the assessment.
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitAssessmentRequest>,
) -> Result<Json<AssessmentWithCandidate>, AppError> {
    let current = require_assessment(&state.db, id).await?;
    if current.status == "completed" {
        return Err(AppError::Conflict("Assessment already completed".to_string()));
    }

    let questions = current.questions.clone().unwrap_or(Value::Null);
    let score = score_answers(&questions, &req.answers);
    let now = Utc::now();
    let duration = current.started_at.map(|started| rounded_minutes(started, now));
    let answers = serde_json::to_value(&req.answers).map_err(|e| AppError::Internal(e.into()))?;

    let assessment = sqlx::query_as::<_, AssessmentRow>(
        r#"
        UPDATE assessments SET
            answers      = $2,
            score        = $3,
            max_score    = $4,
            duration     = $5,
            status       = 'completed',
            completed_at = $6,
            updated_at   = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(answers)
    .bind(score)
    .bind(MAX_SCORE)
    .bind(duration)
    .bind(now)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::info!("Assessment {id} submitted, score {score}");
    Ok(Json(with_candidate(&state.db, assessment).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Assessment {id} not found"))
}

async fn require_assessment(pool: &PgPool, id: Uuid) -> Result<AssessmentRow, AppError> {
    sqlx::query_as::<_, AssessmentRow>("SELECT * FROM assessments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn insert_assessment(
    pool: &PgPool,
    candidate_id: Uuid,
    name: &str,
    assessment_type: &str,
    time_limit: i32,
    questions: Option<Value>,
) -> Result<AssessmentRow, AppError> {
    let row = sqlx::query_as::<_, AssessmentRow>(
        r#"
        INSERT INTO assessments (candidate_id, name, assessment_type, status, time_limit, questions)
        VALUES ($1, $2, $3, 'pending', $4, $5)
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(name)
    .bind(assessment_type)
    .bind(time_limit)
    .bind(questions)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

async fn attach_candidates(
    pool: &PgPool,
    rows: Vec<AssessmentRow>,
) -> Result<Vec<AssessmentWithCandidate>, AppError> {
    let candidates = candidate_summaries(pool, rows.iter().map(|a| a.candidate_id)).await?;
    let ids: Vec<Uuid> = candidates.keys().copied().collect();
    let candidate_jobs: HashMap<Uuid, Uuid> = sqlx::query_as::<_, (Uuid, Uuid)>(
        "SELECT id, job_posting_id FROM candidates WHERE id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?
    .into_iter()
    .collect();
    let jobs = job_summaries(pool, candidate_jobs.values().copied()).await?;

    Ok(rows
        .into_iter()
        .map(|assessment| {
            let candidate = candidates.get(&assessment.candidate_id).cloned().map(|c| {
                let job_posting = candidate_jobs
                    .get(&c.id)
                    .and_then(|job_id| jobs.get(job_id))
                    .cloned();
                CandidateRef {
                    candidate: c,
                    job_posting,
                }
            });
            AssessmentWithCandidate {
                assessment,
                candidate,
            }
        })
        .collect())
}

async fn with_candidate(
    pool: &PgPool,
    assessment: AssessmentRow,
) -> Result<AssessmentWithCandidate, AppError> {
    let mut rows = attach_candidates(pool, vec![assessment]).await?;
    rows.pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("assessment vanished")))
}

fn validate_time_limit(minutes: i32) -> Result<(), AppError> {
    if (1..=8 * 60).contains(&minutes) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "timeLimit must be between 1 and 480 minutes".to_string(),
        ))
    }
}

/// Flattens the stored skills JSON into the comma-separated list the prompt expects.
fn skills_text(skills: Option<&Value>) -> Option<String> {
    let text = match skills? {
        Value::Array(items) => items
            .iter()
            .filter_map(|s| match s {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skills_text() {
        assert_eq!(
            skills_text(Some(&json!(["Rust", " SQL ", ""]))).as_deref(),
            Some("Rust, SQL")
        );
        assert_eq!(skills_text(Some(&json!("Go"))).as_deref(), Some("Go"));
        assert_eq!(skills_text(Some(&json!([]))), None);
        assert_eq!(skills_text(None), None);
    }

    #[test]
    fn test_validate_time_limit() {
        assert!(validate_time_limit(60).is_ok());
        assert!(validate_time_limit(0).is_err());
        assert!(validate_time_limit(481).is_err());
    }

    #[test]
    fn test_submit_request_accepts_gaps() {
        let req: SubmitAssessmentRequest =
            serde_json::from_value(json!({"answers": ["a", null, "c"]})).unwrap();
        assert_eq!(req.answers, vec![Some("a".into()), None, Some("c".into())]);
    }

    #[test]
    fn test_difficulties() {
        assert!(ensure_one_of("difficulty", "hard", DIFFICULTIES).is_ok());
        assert!(ensure_one_of("difficulty", "nightmare", DIFFICULTIES).is_err());
    }
}
