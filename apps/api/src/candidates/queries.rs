use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::{contains_pattern, non_blank};
use crate::errors::AppError;
use crate::models::assessment::AssessmentRow;
use crate::models::candidate::{CandidateRow, NoteRow, ScreeningAnswerRow};
use crate::models::communication::CommunicationRow;
use crate::models::interview::InterviewRow;
use crate::models::job::ScreeningQuestionRow;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFilters {
    pub status: Option<String>,
    pub job_id: Option<Uuid>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Maps a client-facing sort key to its column. Only these keys are accepted.
pub fn sort_column(sort_by: &str) -> Option<&'static str> {
    match sort_by {
        "createdAt" => Some("created_at"),
        "updatedAt" => Some("updated_at"),
        "firstName" => Some("first_name"),
        "lastName" => Some("last_name"),
        "aiScore" => Some("ai_score"),
        "yearsExperience" => Some("years_experience"),
        "expectedSalary" => Some("expected_salary"),
        "status" => Some("status"),
        _ => None,
    }
}

/// Resolves the ORDER BY clause, rejecting unknown keys and directions.
pub fn order_clause(sort_by: Option<&str>, sort_order: Option<&str>) -> Result<String, AppError> {
    let column = match sort_by {
        None => "created_at",
        Some(key) => sort_column(key).ok_or_else(|| {
            AppError::Validation(format!(
                "sortBy must be one of: createdAt, updatedAt, firstName, lastName, aiScore, \
                 yearsExperience, expectedSalary, status (got '{key}')"
            ))
        })?,
    };
    let direction = match sort_order.map(str::to_ascii_lowercase).as_deref() {
        None | Some("desc") => "DESC",
        Some("asc") => "ASC",
        Some(other) => {
            return Err(AppError::Validation(format!(
                "sortOrder must be asc or desc (got '{other}')"
            )))
        }
    };
    // NULL scores sort after real ones in both directions.
    Ok(format!("{column} {direction} NULLS LAST, id ASC"))
}

pub async fn list_candidates(
    pool: &PgPool,
    filters: &CandidateFilters,
) -> Result<Vec<CandidateRow>, AppError> {
    let order = order_clause(
        non_blank(&filters.sort_by),
        non_blank(&filters.sort_order),
    )?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM candidates WHERE TRUE");
    if let Some(status) = non_blank(&filters.status) {
        qb.push(" AND status = ").push_bind(status.to_string());
    }
    if let Some(job_id) = filters.job_id {
        qb.push(" AND job_posting_id = ").push_bind(job_id);
    }
    if let Some(search) = non_blank(&filters.search) {
        let pattern = contains_pattern(search);
        qb.push(" AND (first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR current_title ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    qb.push(" ORDER BY ").push(order);

    Ok(qb.build_query_as::<CandidateRow>().fetch_all(pool).await?)
}

pub async fn find_candidate(pool: &PgPool, id: Uuid) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Loads a candidate or fails with 404.
pub async fn require_candidate(pool: &PgPool, id: Uuid) -> Result<CandidateRow, AppError> {
    find_candidate(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
}

/// Most recent interview per candidate.
pub async fn latest_interviews(
    pool: &PgPool,
    candidate_ids: &[Uuid],
) -> Result<Vec<InterviewRow>, sqlx::Error> {
    if candidate_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, InterviewRow>(
        r#"
        SELECT DISTINCT ON (candidate_id) *
        FROM interviews
        WHERE candidate_id = ANY($1)
        ORDER BY candidate_id, scheduled_at DESC
        "#,
    )
    .bind(candidate_ids)
    .fetch_all(pool)
    .await
}

pub async fn interviews_for(pool: &PgPool, candidate_id: Uuid) -> Result<Vec<InterviewRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewRow>(
        "SELECT * FROM interviews WHERE candidate_id = $1 ORDER BY scheduled_at DESC",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}

/// Notes on a candidate, newest first. Private notes are only returned to their author.
pub async fn visible_notes(
    pool: &PgPool,
    candidate_id: Uuid,
    viewer_id: Uuid,
) -> Result<Vec<NoteRow>, sqlx::Error> {
    sqlx::query_as::<_, NoteRow>(
        r#"
        SELECT * FROM notes
        WHERE candidate_id = $1 AND (NOT is_private OR author_id = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(candidate_id)
    .bind(viewer_id)
    .fetch_all(pool)
    .await
}

pub async fn screening_answers_for(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<ScreeningAnswerRow>, sqlx::Error> {
    sqlx::query_as::<_, ScreeningAnswerRow>(
        "SELECT * FROM screening_answers WHERE candidate_id = $1 ORDER BY created_at ASC",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}

pub async fn questions_by_id(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<Vec<ScreeningQuestionRow>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, ScreeningQuestionRow>("SELECT * FROM screening_questions WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub async fn communications_for(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<CommunicationRow>, sqlx::Error> {
    sqlx::query_as::<_, CommunicationRow>(
        "SELECT * FROM communications WHERE candidate_id = $1 ORDER BY created_at DESC",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}

pub async fn assessments_for(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<AssessmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>(
        "SELECT * FROM assessments WHERE candidate_id = $1 ORDER BY created_at DESC",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order_is_newest_first() {
        assert_eq!(
            order_clause(None, None).unwrap(),
            "created_at DESC NULLS LAST, id ASC"
        );
    }

    #[test]
    fn test_order_maps_camel_case_keys() {
        assert_eq!(
            order_clause(Some("aiScore"), Some("ASC")).unwrap(),
            "ai_score ASC NULLS LAST, id ASC"
        );
    }

    #[test]
    fn test_order_rejects_unknown_key_and_direction() {
        assert!(order_clause(Some("password_hash"), None).is_err());
        assert!(order_clause(Some("createdAt; DROP TABLE users"), None).is_err());
        assert!(order_clause(None, Some("sideways")).is_err());
    }
}
