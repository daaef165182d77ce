//! Batch loaders for the related records embedded in API responses
//! (creator, author, interviewer, candidate, job). One query per relation, keyed by id.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::candidate::CandidateSummary;
use crate::models::job::JobSummary;
use crate::models::user::UserSummary;

pub async fn user_summaries(
    pool: &PgPool,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, UserSummary>, sqlx::Error> {
    let ids = dedup(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query_as::<_, UserSummary>(
        "SELECT id, first_name, last_name, email FROM users WHERE id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|u| (u.id, u)).collect())
}

pub async fn candidate_summaries(
    pool: &PgPool,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, CandidateSummary>, sqlx::Error> {
    let ids = dedup(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query_as::<_, CandidateSummary>(
        "SELECT id, first_name, last_name, email, current_title FROM candidates WHERE id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|c| (c.id, c)).collect())
}

pub async fn job_summaries(
    pool: &PgPool,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, JobSummary>, sqlx::Error> {
    let ids = dedup(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query_as::<_, JobSummary>(
        "SELECT id, title, department FROM job_postings WHERE id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|j| (j.id, j)).collect())
}

/// Counts child rows per parent id, e.g. candidates per job.
/// `table` and `fk` are compile-time identifiers, never user input.
pub async fn child_counts(
    pool: &PgPool,
    table: &'static str,
    fk: &'static str,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, i64>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let sql = format!("SELECT {fk}, COUNT(*) FROM {table} WHERE {fk} = ANY($1) GROUP BY {fk}");
    let rows: Vec<(Uuid, i64)> = sqlx::query_as(&sql).bind(ids).fetch_all(pool).await?;
    Ok(rows.into_iter().collect())
}

fn dedup(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_removes_repeats() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = dedup(vec![a, b, a, a]);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a) && ids.contains(&b));
    }
}
