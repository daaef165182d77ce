//! Axum route handlers for the Jobs API.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::ai::models::GeneratedJobDescription;
use crate::ai::service::{generate_job_description, generate_screening_questions, JobOutline};
use crate::auth::AuthUser;
use crate::errors::{ensure_one_of, require_non_empty, AppError};
use crate::extract::{Json, Path, Query};
use crate::jobs::queries::{self, JobFilters};
use crate::models::candidate::CandidateRow;
use crate::models::interview::InterviewRow;
use crate::models::job::{JobPostingRow, ScreeningQuestionRow, JOB_STATUSES};
use crate::models::user::UserSummary;
use crate::relations::{child_counts, user_summaries};
use crate::serde_ext::optional_int;
use crate::state::AppState;

pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const MAX_QUESTION_COUNT: u32 = 20;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    #[serde(default, deserialize_with = "optional_int")]
    pub salary_min: Option<i32>,
    #[serde(default, deserialize_with = "optional_int")]
    pub salary_max: Option<i32>,
    pub description: String,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    #[serde(default, deserialize_with = "optional_int")]
    pub salary_min: Option<i32>,
    #[serde(default, deserialize_with = "optional_int")]
    pub salary_max: Option<i32>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDescriptionRequest {
    pub title: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub count: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobWithCreator {
    #[serde(flatten)]
    pub job: JobPostingRow,
    pub created_by: Option<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct JobCounts {
    pub candidates: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListItem {
    #[serde(flatten)]
    pub job: JobPostingRow,
    pub created_by: Option<UserSummary>,
    #[serde(rename = "_count")]
    pub count: JobCounts,
}

#[derive(Debug, Serialize)]
pub struct CandidateWithInterviews {
    #[serde(flatten)]
    pub candidate: CandidateRow,
    pub interviews: Vec<InterviewRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: JobPostingRow,
    pub created_by: Option<UserSummary>,
    pub candidates: Vec<CandidateWithInterviews>,
    pub screening_questions: Vec<ScreeningQuestionRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<JobFilters>,
) -> Result<Json<Vec<JobListItem>>, AppError> {
    let jobs = queries::list_jobs(&state.db, &filters).await?;

    let ids: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();
    let creators = user_summaries(&state.db, jobs.iter().map(|j| j.created_by_id)).await?;
    let counts = child_counts(&state.db, "candidates", "job_posting_id", &ids).await?;

    let items = jobs
        .into_iter()
        .map(|job| JobListItem {
            created_by: creators
                .get(&job.created_by_id)
                .cloned()
                .map(UserSummary::without_email),
            count: JobCounts {
                candidates: counts.get(&job.id).copied().unwrap_or(0),
            },
            job,
        })
        .collect();

    Ok(Json(items))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JobDetail>, AppError> {
    let job = queries::find_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;

    let created_by = creator_of(&state, &job).await?;
    let candidates = queries::candidates_for_job(&state.db, id).await?;
    let candidate_ids: Vec<Uuid> = candidates.iter().map(|c| c.id).collect();
    let interviews = queries::interviews_for_candidates(&state.db, &candidate_ids).await?;
    let screening_questions = queries::screening_questions(&state.db, id).await?;

    let mut by_candidate: HashMap<Uuid, Vec<InterviewRow>> = HashMap::new();
    for interview in interviews {
        by_candidate
            .entry(interview.candidate_id)
            .or_default()
            .push(interview);
    }

    let candidates = candidates
        .into_iter()
        .map(|candidate| CandidateWithInterviews {
            interviews: by_candidate.remove(&candidate.id).unwrap_or_default(),
            candidate,
        })
        .collect();

    Ok(Json(JobDetail {
        job,
        created_by,
        candidates,
        screening_questions,
    }))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobWithCreator>), AppError> {
    require_non_empty("title", &req.title)?;
    require_non_empty("department", &req.department)?;
    require_non_empty("location", &req.location)?;
    require_non_empty("description", &req.description)?;
    let status = req.status.unwrap_or_else(|| "draft".to_string());
    ensure_one_of("status", &status, JOB_STATUSES)?;
    validate_salary_range(req.salary_min, req.salary_max)?;

    let job = sqlx::query_as::<_, JobPostingRow>(
        r#"
        INSERT INTO job_postings
            (title, department, location, job_type, salary_min, salary_max,
             description, requirements, benefits, status, created_by_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(req.title.trim())
    .bind(req.department.trim())
    .bind(req.location.trim())
    .bind(req.job_type.unwrap_or_else(|| "full-time".to_string()))
    .bind(req.salary_min)
    .bind(req.salary_max)
    .bind(&req.description)
    .bind(req.requirements)
    .bind(req.benefits)
    .bind(&status)
    .bind(user.id)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Job {} created by {}", job.id, user.id);

    let created_by = creator_of(&state, &job).await?;
    Ok((StatusCode::CREATED, Json(JobWithCreator { job, created_by })))
}

/// PUT /api/jobs/:id
///
/// Absent fields keep their stored value.
pub async fn handle_update_job(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<Json<JobWithCreator>, AppError> {
    if let Some(status) = &req.status {
        ensure_one_of("status", status, JOB_STATUSES)?;
    }
    validate_salary_range(req.salary_min, req.salary_max)?;

    let job = sqlx::query_as::<_, JobPostingRow>(
        r#"
        UPDATE job_postings SET
            title        = COALESCE($2, title),
            department   = COALESCE($3, department),
            location     = COALESCE($4, location),
            job_type     = COALESCE($5, job_type),
            salary_min   = COALESCE($6, salary_min),
            salary_max   = COALESCE($7, salary_max),
            description  = COALESCE($8, description),
            requirements = COALESCE($9, requirements),
            benefits     = COALESCE($10, benefits),
            status       = COALESCE($11, status),
            updated_at   = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(req.title)
    .bind(req.department)
    .bind(req.location)
    .bind(req.job_type)
    .bind(req.salary_min)
    .bind(req.salary_max)
    .bind(req.description)
    .bind(req.requirements)
    .bind(req.benefits)
    .bind(req.status)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;

    let created_by = creator_of(&state, &job).await?;
    Ok(Json(JobWithCreator { job, created_by }))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }

    tracing::info!("Job {id} deleted");
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}

/// POST /api/jobs/ai/generate-description
pub async fn handle_generate_description(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<GenerateDescriptionRequest>,
) -> Result<Json<GeneratedJobDescription>, AppError> {
    require_non_empty("title", &req.title)?;

    let outline = JobOutline {
        title: &req.title,
        department: &req.department,
        location: &req.location,
        job_type: &req.job_type,
        notes: req.notes.as_deref(),
    };
    let generated = generate_job_description(&state.llm, &outline).await?;
    Ok(Json(generated))
}

/// POST /api/jobs/:id/ai/generate-questions
///
/// Generates screening questions for the job and stores them in one transaction.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<GenerateQuestionsRequest>>,
) -> Result<Json<Vec<ScreeningQuestionRow>>, AppError> {
    let requested = body.and_then(|Json(b)| b.count);
    let count = clamp_question_count(requested);

    let job = queries::find_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;

    let generated =
        generate_screening_questions(&state.llm, &job.title, &job.description, count).await?;

    let mut tx = state.db.begin().await?;
    let mut saved = Vec::with_capacity(generated.questions.len());
    for (index, draft) in generated.questions.into_iter().enumerate() {
        if draft.question.trim().is_empty() {
            continue;
        }
        let options = draft
            .options
            .map(|o| serde_json::to_value(o).map_err(|e| AppError::Internal(e.into())))
            .transpose()?;
        let row = sqlx::query_as::<_, ScreeningQuestionRow>(
            r#"
            INSERT INTO screening_questions
                (job_posting_id, question, question_type, options, weight, position, ai_generated)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(draft.question.trim())
        .bind(&draft.question_type)
        .bind(options)
        .bind(question_weight(draft.weight))
        .bind(index as i32)
        .fetch_one(&mut *tx)
        .await?;
        saved.push(row);
    }
    tx.commit().await?;

    tracing::info!("Generated {} screening questions for job {id}", saved.len());
    Ok(Json(saved))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn creator_of(state: &AppState, job: &JobPostingRow) -> Result<Option<UserSummary>, AppError> {
    let mut creators = user_summaries(&state.db, [job.created_by_id]).await?;
    Ok(creators.remove(&job.created_by_id))
}

fn validate_salary_range(min: Option<i32>, max: Option<i32>) -> Result<(), AppError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(AppError::Validation(
            "salaryMin cannot be greater than salaryMax".to_string(),
        )),
        _ => Ok(()),
    }
}

fn clamp_question_count(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_QUESTION_COUNT)
        .clamp(1, MAX_QUESTION_COUNT)
}

/// Weights run 1..=5; the model omits them or overshoots now and then.
fn question_weight(weight: Option<i32>) -> i32 {
    weight.unwrap_or(1).clamp(1, 5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job() -> JobPostingRow {
        JobPostingRow {
            id: Uuid::new_v4(),
            title: "Backend Engineer".into(),
            department: "Engineering".into(),
            location: "Remote".into(),
            job_type: "full-time".into(),
            salary_min: Some(120_000),
            salary_max: None,
            description: "Build services".into(),
            requirements: None,
            benefits: None,
            status: "active".into(),
            created_by_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_question_count_defaults_and_clamps() {
        assert_eq!(clamp_question_count(None), 5);
        assert_eq!(clamp_question_count(Some(0)), 1);
        assert_eq!(clamp_question_count(Some(50)), 20);
        assert_eq!(clamp_question_count(Some(8)), 8);
    }

    #[test]
    fn test_question_weight_defaults_to_one() {
        assert_eq!(question_weight(None), 1);
        assert_eq!(question_weight(Some(9)), 5);
        assert_eq!(question_weight(Some(3)), 3);
    }

    #[test]
    fn test_salary_range_validation() {
        assert!(validate_salary_range(Some(100), Some(50)).is_err());
        assert!(validate_salary_range(Some(50), None).is_ok());
        assert!(validate_salary_range(Some(50), Some(100)).is_ok());
    }

    #[test]
    fn test_list_item_wire_shape() {
        let item = JobListItem {
            job: job(),
            created_by: None,
            count: JobCounts { candidates: 3 },
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "full-time");
        assert_eq!(value["salaryMin"], 120_000);
        assert_eq!(value["_count"]["candidates"], 3);
        assert!(value["createdBy"].is_null());
    }

    #[test]
    fn test_update_request_accepts_string_salary() {
        let req: UpdateJobRequest =
            serde_json::from_value(json!({"salaryMax": "150000", "type": "contract"})).unwrap();
        assert_eq!(req.salary_max, Some(150_000));
        assert_eq!(req.job_type.as_deref(), Some("contract"));
        assert!(req.title.is_none());
    }
}
