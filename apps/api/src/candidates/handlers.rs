//! Axum route handlers for the Candidates API.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::ai::models::{CandidateRankings, RankingCandidate, ResumeAnalysis};
use crate::ai::service::{analyze_resume, score_screening_answer};
use crate::auth::AuthUser;
use crate::candidates::queries::{self, CandidateFilters};
use crate::candidates::resume::{
    delete_resume, extract_text, read_resume_field, store_resume, superseded_key,
};
use crate::errors::{ensure_one_of, require_non_empty, AppError};
use crate::extract::{Json, Path, Query};
use crate::jobs::queries::{candidates_for_job, find_job};
use crate::models::assessment::AssessmentRow;
use crate::models::candidate::{CandidateRow, NoteRow, ScreeningAnswerRow, CANDIDATE_STATUSES};
use crate::models::communication::CommunicationRow;
use crate::models::interview::InterviewRow;
use crate::models::job::{JobPostingRow, JobSummary, ScreeningQuestionRow};
use crate::models::user::UserSummary;
use crate::relations::{child_counts, job_summaries, user_summaries};
use crate::serde_ext::optional_int;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidateRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linked_in: Option<String>,
    pub portfolio: Option<String>,
    pub resume_text: Option<String>,
    pub cover_letter: Option<String>,
    pub source: Option<String>,
    pub job_posting_id: Uuid,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    #[serde(default, deserialize_with = "optional_int")]
    pub years_experience: Option<i32>,
    #[serde(default, deserialize_with = "optional_int")]
    pub expected_salary: Option<i32>,
    pub status: Option<String>,
    pub skills: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linked_in: Option<String>,
    pub portfolio: Option<String>,
    pub resume_text: Option<String>,
    pub cover_letter: Option<String>,
    pub source: Option<String>,
    pub job_posting_id: Option<Uuid>,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    #[serde(default, deserialize_with = "optional_int")]
    pub years_experience: Option<i32>,
    #[serde(default, deserialize_with = "optional_int")]
    pub expected_salary: Option<i32>,
    pub status: Option<String>,
    pub skills: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub content: String,
    #[serde(rename = "type")]
    pub note_type: Option<String>,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningAnswerRequest {
    pub question_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct CandidateCounts {
    pub notes: i64,
    pub communications: i64,
    pub assessments: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateListItem {
    #[serde(flatten)]
    pub candidate: CandidateRow,
    pub job_posting: Option<JobSummary>,
    /// At most one entry: the most recent interview.
    pub interviews: Vec<InterviewRow>,
    #[serde(rename = "_count")]
    pub count: CandidateCounts,
}

#[derive(Debug, Serialize)]
pub struct InterviewWithInterviewer {
    #[serde(flatten)]
    pub interview: InterviewRow,
    pub interviewer: Option<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct AnswerWithQuestion {
    #[serde(flatten)]
    pub answer: ScreeningAnswerRow,
    pub question: Option<ScreeningQuestionRow>,
}

#[derive(Debug, Serialize)]
pub struct NoteWithAuthor {
    #[serde(flatten)]
    pub note: NoteRow,
    pub author: Option<UserSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDetail {
    #[serde(flatten)]
    pub candidate: CandidateRow,
    pub job_posting: Option<JobPostingRow>,
    pub interviews: Vec<InterviewWithInterviewer>,
    pub screening_answers: Vec<AnswerWithQuestion>,
    pub notes: Vec<NoteWithAuthor>,
    pub communications: Vec<CommunicationRow>,
    pub assessments: Vec<AssessmentRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateWithJob {
    #[serde(flatten)]
    pub candidate: CandidateRow,
    pub job_posting: Option<JobSummary>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResumeResponse {
    pub candidate: CandidateRow,
    pub analysis: ResumeAnalysis,
}

// ────────────────────────────────────────────────────────────────────────────
// CRUD
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<CandidateFilters>,
) -> Result<Json<Vec<CandidateListItem>>, AppError> {
    let candidates = queries::list_candidates(&state.db, &filters).await?;
    let ids: Vec<Uuid> = candidates.iter().map(|c| c.id).collect();

    let jobs = job_summaries(&state.db, candidates.iter().map(|c| c.job_posting_id)).await?;
    let mut latest: HashMap<Uuid, InterviewRow> = queries::latest_interviews(&state.db, &ids)
        .await?
        .into_iter()
        .map(|i| (i.candidate_id, i))
        .collect();
    let notes = child_counts(&state.db, "notes", "candidate_id", &ids).await?;
    let communications = child_counts(&state.db, "communications", "candidate_id", &ids).await?;
    let assessments = child_counts(&state.db, "assessments", "candidate_id", &ids).await?;

    let items = candidates
        .into_iter()
        .map(|candidate| {
            let id = candidate.id;
            CandidateListItem {
                job_posting: jobs.get(&candidate.job_posting_id).cloned(),
                interviews: latest.remove(&id).into_iter().collect(),
                count: CandidateCounts {
                    notes: notes.get(&id).copied().unwrap_or(0),
                    communications: communications.get(&id).copied().unwrap_or(0),
                    assessments: assessments.get(&id).copied().unwrap_or(0),
                },
                candidate,
            }
        })
        .collect();

    Ok(Json(items))
}

/// GET /api/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateDetail>, AppError> {
    let candidate = queries::require_candidate(&state.db, id).await?;

    let job_posting = find_job(&state.db, candidate.job_posting_id).await?;
    let interviews = queries::interviews_for(&state.db, id).await?;
    let answers = queries::screening_answers_for(&state.db, id).await?;
    let notes = queries::visible_notes(&state.db, id, user.id).await?;
    let communications = queries::communications_for(&state.db, id).await?;
    let assessments = queries::assessments_for(&state.db, id).await?;

    let users = user_summaries(
        &state.db,
        interviews
            .iter()
            .map(|i| i.interviewer_id)
            .chain(notes.iter().map(|n| n.author_id)),
    )
    .await?;
    let question_ids: Vec<Uuid> = answers.iter().map(|a| a.question_id).collect();
    let questions: HashMap<Uuid, ScreeningQuestionRow> =
        queries::questions_by_id(&state.db, &question_ids)
            .await?
            .into_iter()
            .map(|q| (q.id, q))
            .collect();

    Ok(Json(CandidateDetail {
        job_posting,
        interviews: interviews
            .into_iter()
            .map(|interview| InterviewWithInterviewer {
                interviewer: users.get(&interview.interviewer_id).cloned(),
                interview,
            })
            .collect(),
        screening_answers: answers
            .into_iter()
            .map(|answer| AnswerWithQuestion {
                question: questions.get(&answer.question_id).cloned(),
                answer,
            })
            .collect(),
        notes: notes
            .into_iter()
            .map(|note| NoteWithAuthor {
                author: users.get(&note.author_id).cloned().map(UserSummary::without_email),
                note,
            })
            .collect(),
        communications,
        assessments,
        candidate,
    }))
}

/// POST /api/candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<CreateCandidateRequest>,
) -> Result<(StatusCode, Json<CandidateWithJob>), AppError> {
    require_non_empty("firstName", &req.first_name)?;
    require_non_empty("lastName", &req.last_name)?;
    validate_email(&req.email)?;
    let status = req.status.unwrap_or_else(|| "new".to_string());
    ensure_one_of("status", &status, CANDIDATE_STATUSES)?;
    require_job(&state, req.job_posting_id).await?;

    let candidate = sqlx::query_as::<_, CandidateRow>(
        r#"
        INSERT INTO candidates
            (first_name, last_name, email, phone, linked_in, portfolio, resume_text,
             cover_letter, source, job_posting_id, current_title, current_company,
             years_experience, expected_salary, status, skills)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING *
        "#,
    )
    .bind(req.first_name.trim())
    .bind(req.last_name.trim())
    .bind(req.email.trim())
    .bind(req.phone)
    .bind(req.linked_in)
    .bind(req.portfolio)
    .bind(req.resume_text)
    .bind(req.cover_letter)
    .bind(req.source)
    .bind(req.job_posting_id)
    .bind(req.current_title)
    .bind(req.current_company)
    .bind(req.years_experience)
    .bind(req.expected_salary)
    .bind(&status)
    .bind(req.skills)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Candidate {} added to job {}", candidate.id, candidate.job_posting_id);
    let body = with_job(&state, candidate).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// PUT /api/candidates/:id
///
/// Absent fields keep their stored value.
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCandidateRequest>,
) -> Result<Json<CandidateWithJob>, AppError> {
    if let Some(status) = &req.status {
        ensure_one_of("status", status, CANDIDATE_STATUSES)?;
    }
    if let Some(email) = &req.email {
        validate_email(email)?;
    }
    if let Some(job_id) = req.job_posting_id {
        require_job(&state, job_id).await?;
    }

    let candidate = sqlx::query_as::<_, CandidateRow>(
        r#"
        UPDATE candidates SET
            first_name       = COALESCE($2, first_name),
            last_name        = COALESCE($3, last_name),
            email            = COALESCE($4, email),
            phone            = COALESCE($5, phone),
            linked_in        = COALESCE($6, linked_in),
            portfolio        = COALESCE($7, portfolio),
            resume_text      = COALESCE($8, resume_text),
            cover_letter     = COALESCE($9, cover_letter),
            source           = COALESCE($10, source),
            job_posting_id   = COALESCE($11, job_posting_id),
            current_title    = COALESCE($12, current_title),
            current_company  = COALESCE($13, current_company),
            years_experience = COALESCE($14, years_experience),
            expected_salary  = COALESCE($15, expected_salary),
            status           = COALESCE($16, status),
            skills           = COALESCE($17, skills),
            updated_at       = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(req.first_name)
    .bind(req.last_name)
    .bind(req.email.map(|e| e.trim().to_string()))
    .bind(req.phone)
    .bind(req.linked_in)
    .bind(req.portfolio)
    .bind(req.resume_text)
    .bind(req.cover_letter)
    .bind(req.source)
    .bind(req.job_posting_id)
    .bind(req.current_title)
    .bind(req.current_company)
    .bind(req.years_experience)
    .bind(req.expected_salary)
    .bind(req.status)
    .bind(req.skills)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;

    Ok(Json(with_job(&state, candidate).await?))
}

/// DELETE /api/candidates/:id
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let resume_key: Option<String> =
        sqlx::query_scalar("DELETE FROM candidates WHERE id = $1 RETURNING resume_key")
            .bind(id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    if let Some(key) = resume_key.as_deref().filter(|k| !k.is_empty()) {
        delete_resume(&state.s3, &state.config.s3_bucket, key).await;
    }

    tracing::info!("Candidate {id} deleted");
    Ok(Json(json!({ "message": "Candidate deleted successfully" })))
}

// ────────────────────────────────────────────────────────────────────────────
// Notes, resumes, screening answers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/candidates/:id/notes
pub async fn handle_add_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteWithAuthor>), AppError> {
    require_non_empty("content", &req.content)?;
    queries::require_candidate(&state.db, id).await?;

    let note = sqlx::query_as::<_, NoteRow>(
        r#"
        INSERT INTO notes (candidate_id, author_id, content, note_type, is_private)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user.id)
    .bind(req.content.trim())
    .bind(req.note_type.unwrap_or_else(|| "general".to_string()))
    .bind(req.is_private)
    .fetch_one(&state.db)
    .await?;

    let author = UserSummary {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: None,
    };
    Ok((
        StatusCode::CREATED,
        Json(NoteWithAuthor {
            note,
            author: Some(author),
        }),
    ))
}

/// POST /api/candidates/:id/resume
///
/// Accepts a PDF in the `resume` multipart field, keeps the original in S3 and
/// replaces the candidate's resume text with the extracted text.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<CandidateRow>, AppError> {
    let previous_key = queries::require_candidate(&state.db, id).await?.resume_key;

    let upload = read_resume_field(multipart).await?;
    tracing::info!(
        "Resume upload for candidate {id}: {} ({} bytes)",
        upload.file_name.as_deref().unwrap_or("unnamed"),
        upload.data.len()
    );

    let text = extract_text(upload.data.clone()).await?;
    let bucket = &state.config.s3_bucket;
    let key = store_resume(&state.s3, bucket, id, upload.data).await?;

    let updated = sqlx::query_as::<_, CandidateRow>(
        r#"
        UPDATE candidates SET resume_text = $2, resume_key = $3, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&text)
    .bind(&key)
    .fetch_optional(&state.db)
    .await;

    let candidate = match updated {
        Ok(Some(candidate)) => candidate,
        Ok(None) => {
            delete_resume(&state.s3, bucket, &key).await;
            return Err(AppError::NotFound(format!("Candidate {id} not found")));
        }
        Err(e) => {
            delete_resume(&state.s3, bucket, &key).await;
            return Err(e.into());
        }
    };

    if let Some(stale) = superseded_key(previous_key.as_deref(), &key) {
        delete_resume(&state.s3, bucket, stale).await;
    }

    Ok(Json(candidate))
}

/// POST /api/candidates/:id/screening-answers
pub async fn handle_submit_screening_answer(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ScreeningAnswerRequest>,
) -> Result<(StatusCode, Json<AnswerWithQuestion>), AppError> {
    require_non_empty("answer", &req.answer)?;
    let candidate = queries::require_candidate(&state.db, id).await?;

    let question = queries::questions_by_id(&state.db, &[req.question_id])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("Question {} not found", req.question_id)))?;
    if question.job_posting_id != candidate.job_posting_id {
        return Err(AppError::Validation(
            "Question does not belong to the candidate's job".to_string(),
        ));
    }
    let job = require_job(&state, candidate.job_posting_id).await?;

    let job_context = format!("{}\n\n{}", job.title, job.description);
    let evaluation =
        score_screening_answer(&state.llm, &question.question, &req.answer, &job_context).await?;

    let answer = sqlx::query_as::<_, ScreeningAnswerRow>(
        r#"
        INSERT INTO screening_answers (candidate_id, question_id, answer, ai_score, ai_feedback)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(question.id)
    .bind(req.answer.trim())
    .bind(evaluation.score)
    .bind(&evaluation.feedback)
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AnswerWithQuestion {
            answer,
            question: Some(question),
        }),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// AI
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/candidates/:id/ai/analyze-resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalyzeResumeResponse>, AppError> {
    let candidate = queries::require_candidate(&state.db, id).await?;
    let resume_text = candidate
        .resume_text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No resume text available".to_string()))?;
    let job = require_job(&state, candidate.job_posting_id).await?;

    let analysis = analyze_resume(&state.llm, resume_text, &job_requirements(&job)).await?;

    let candidate = sqlx::query_as::<_, CandidateRow>(
        r#"
        UPDATE candidates SET
            ai_score          = $2,
            ai_summary        = $3,
            ai_strengths      = $4,
            ai_weaknesses     = $5,
            ai_recommendation = $6,
            skills            = COALESCE($7, skills),
            education         = COALESCE($8, education),
            years_experience  = COALESCE($9, years_experience),
            current_title     = COALESCE($10, current_title),
            current_company   = COALESCE($11, current_company),
            updated_at        = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(analysis.score)
    .bind(&analysis.summary)
    .bind(to_json(&analysis.strengths)?)
    .bind(to_json(&analysis.weaknesses)?)
    .bind(&analysis.recommendation)
    .bind(non_empty_json(&analysis.skills)?)
    .bind(non_empty_json(&analysis.education)?)
    .bind(analysis.years_experience.map(round_years))
    .bind(analysis.current_title.as_deref().filter(|t| !t.trim().is_empty()))
    .bind(analysis.current_company.as_deref().filter(|c| !c.trim().is_empty()))
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;

    tracing::info!("Candidate {id} analyzed, score {}", analysis.score);
    Ok(Json(AnalyzeResumeResponse {
        candidate,
        analysis,
    }))
}

/// POST /api/candidates/job/:jobId/ai/rank
pub async fn handle_rank_candidates(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<CandidateRankings>, AppError> {
    let job = require_job(&state, job_id).await?;
    let candidates = candidates_for_job(&state.db, job_id).await?;
    if candidates.is_empty() {
        return Err(AppError::Validation("No candidates to rank".to_string()));
    }

    let entries: Vec<RankingCandidate> = candidates.iter().map(ranking_entry).collect();
    let rankings = state
        .ranker
        .rank(&entries, &job_requirements(&job))
        .await?;

    tracing::info!(
        "Ranked {} candidates for job {job_id} with {}",
        entries.len(),
        state.ranker.backend()
    );
    Ok(Json(rankings))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn require_job(state: &AppState, id: Uuid) -> Result<JobPostingRow, AppError> {
    find_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

async fn with_job(state: &AppState, candidate: CandidateRow) -> Result<CandidateWithJob, AppError> {
    let mut jobs = job_summaries(&state.db, [candidate.job_posting_id]).await?;
    Ok(CandidateWithJob {
        job_posting: jobs.remove(&candidate.job_posting_id),
        candidate,
    })
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::Validation("email must be a valid address".to_string())),
    }
}

/// Description plus requirements, the text candidates are judged against.
fn job_requirements(job: &JobPostingRow) -> String {
    match job.requirements.as_deref().filter(|r| !r.trim().is_empty()) {
        Some(requirements) => format!(
            "{}\n\n{}\n\nRequirements:\n{}",
            job.title, job.description, requirements
        ),
        None => format!("{}\n\n{}", job.title, job.description),
    }
}

fn ranking_entry(candidate: &CandidateRow) -> RankingCandidate {
    RankingCandidate {
        id: candidate.id.to_string(),
        name: candidate.full_name(),
        summary: candidate.ai_summary.clone(),
        score: candidate.ai_score,
        experience: candidate.years_experience,
        skills: candidate.skills.clone(),
    }
}

fn round_years(years: f64) -> i32 {
    years.round().clamp(0.0, 80.0) as i32
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))
}

/// Serializes a list for a JSONB column, or `None` when the model returned nothing.
fn non_empty_json<T: Serialize>(items: &[T]) -> Result<Option<Value>, AppError> {
    if items.is_empty() {
        return Ok(None);
    }
    to_json(items).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candidate() -> CandidateRow {
        CandidateRow {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: None,
            linked_in: Some("https://linkedin.com/in/ada".into()),
            portfolio: None,
            resume_text: None,
            resume_key: None,
            cover_letter: None,
            source: Some("referral".into()),
            job_posting_id: Uuid::new_v4(),
            current_title: Some("Engineer".into()),
            current_company: None,
            years_experience: Some(7),
            expected_salary: None,
            status: "new".into(),
            skills: Some(json!(["rust", "sql"])),
            education: None,
            ai_score: Some(88.0),
            ai_summary: Some("Strong".into()),
            ai_strengths: None,
            ai_weaknesses: None,
            ai_recommendation: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.io").is_ok());
        assert!(validate_email("@b.io").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_email("nope").is_err());
    }

    #[test]
    fn test_round_years() {
        assert_eq!(round_years(4.6), 5);
        assert_eq!(round_years(-2.0), 0);
    }

    #[test]
    fn test_non_empty_json_skips_empty_lists() {
        let empty: Vec<String> = Vec::new();
        assert!(non_empty_json(&empty).unwrap().is_none());
        assert_eq!(
            non_empty_json(&["rust".to_string()]).unwrap(),
            Some(json!(["rust"]))
        );
    }

    #[test]
    fn test_ranking_entry_uses_stored_analysis() {
        let c = candidate();
        let entry = ranking_entry(&c);
        assert_eq!(entry.id, c.id.to_string());
        assert_eq!(entry.name, "Ada Lovelace");
        assert_eq!(entry.score, Some(88.0));
        assert_eq!(entry.experience, Some(7));
    }

    #[test]
    fn test_list_item_wire_shape() {
        let item = CandidateListItem {
            candidate: candidate(),
            job_posting: None,
            interviews: Vec::new(),
            count: CandidateCounts {
                notes: 2,
                communications: 0,
                assessments: 1,
            },
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["linkedIn"], "https://linkedin.com/in/ada");
        assert_eq!(value["_count"]["notes"], 2);
        assert_eq!(value["interviews"], json!([]));
        assert!(value.get("jobPosting").is_some());
    }

    #[test]
    fn test_create_request_parses_numeric_strings() {
        let req: CreateCandidateRequest = serde_json::from_value(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "jobPostingId": Uuid::new_v4(),
            "yearsExperience": "7",
            "expectedSalary": ""
        }))
        .unwrap();
        assert_eq!(req.years_experience, Some(7));
        assert_eq!(req.expected_salary, None);
    }
}
