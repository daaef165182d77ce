use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::{contains_pattern, non_blank};
use crate::models::candidate::CandidateRow;
use crate::models::interview::InterviewRow;
use crate::models::job::{JobPostingRow, ScreeningQuestionRow};

#[derive(Debug, Default, Deserialize)]
pub struct JobFilters {
    pub status: Option<String>,
    pub department: Option<String>,
    pub search: Option<String>,
}

pub async fn list_jobs(pool: &PgPool, filters: &JobFilters) -> Result<Vec<JobPostingRow>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM job_postings WHERE TRUE");
    if let Some(status) = non_blank(&filters.status) {
        qb.push(" AND status = ").push_bind(status.to_string());
    }
    if let Some(department) = non_blank(&filters.department) {
        qb.push(" AND department = ").push_bind(department.to_string());
    }
    if let Some(search) = non_blank(&filters.search) {
        let pattern = contains_pattern(search);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    qb.push(" ORDER BY created_at DESC");
    qb.build_query_as::<JobPostingRow>().fetch_all(pool).await
}

pub async fn find_job(pool: &PgPool, id: Uuid) -> Result<Option<JobPostingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn candidates_for_job(pool: &PgPool, job_id: Uuid) -> Result<Vec<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        "SELECT * FROM candidates WHERE job_posting_id = $1 ORDER BY created_at DESC",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

pub async fn interviews_for_candidates(
    pool: &PgPool,
    candidate_ids: &[Uuid],
) -> Result<Vec<InterviewRow>, sqlx::Error> {
    if candidate_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, InterviewRow>(
        "SELECT * FROM interviews WHERE candidate_id = ANY($1) ORDER BY scheduled_at DESC",
    )
    .bind(candidate_ids)
    .fetch_all(pool)
    .await
}

pub async fn screening_questions(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<ScreeningQuestionRow>, sqlx::Error> {
    sqlx::query_as::<_, ScreeningQuestionRow>(
        "SELECT * FROM screening_questions WHERE job_posting_id = $1 ORDER BY position ASC, created_at ASC",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}
