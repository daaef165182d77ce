//! Axum route handlers for the Analytics API. All endpoints are read-only aggregates.

use std::collections::HashMap;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::analytics::report::{
    activity_limit, merge_activity, ordered_funnel, rounded_average, source_label, time_to_hire,
    ActivityItem, CandidateActivity, CommunicationActivity, HiredCandidate, InterviewActivity,
    StatusCount, TimeToHire,
};
use crate::auth::AuthUser;
use crate::dates::{optional_bound, Bound};
use crate::errors::AppError;
use crate::extract::{Json, Query};
use crate::models::pipeline::PipelineStageRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelFilters {
    pub job_id: Option<Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<String>,
}

#[derive(Debug, FromRow)]
struct DashboardCounts {
    total_jobs: i64,
    active_jobs: i64,
    total_candidates: i64,
    new_candidates: i64,
    hired_candidates: i64,
    avg_score: Option<f64>,
    scheduled_interviews: i64,
    completed_interviews: i64,
}

#[derive(Debug, Serialize)]
pub struct JobStats {
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStats {
    pub total: i64,
    pub new: i64,
    pub hired: i64,
    pub avg_score: i64,
}

#[derive(Debug, Serialize)]
pub struct InterviewStats {
    pub scheduled: i64,
    pub completed: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub jobs: JobStats,
    pub candidates: CandidateStats,
    pub interviews: InterviewStats,
}

#[derive(Debug, Serialize)]
pub struct PipelineOverview {
    pub pipeline: Vec<StatusCount>,
    pub stages: Vec<PipelineStageRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStats {
    pub source: String,
    pub count: i64,
    pub avg_score: i64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/analytics/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<DashboardStats>, AppError> {
    let counts = sqlx::query_as::<_, DashboardCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM job_postings)                              AS total_jobs,
            (SELECT COUNT(*) FROM job_postings WHERE status = 'active')      AS active_jobs,
            (SELECT COUNT(*) FROM candidates)                                AS total_candidates,
            (SELECT COUNT(*) FROM candidates WHERE status = 'new')           AS new_candidates,
            (SELECT COUNT(*) FROM candidates WHERE status = 'hired')         AS hired_candidates,
            (SELECT AVG(ai_score) FROM candidates WHERE ai_score IS NOT NULL) AS avg_score,
            (SELECT COUNT(*) FROM interviews WHERE status = 'scheduled')     AS scheduled_interviews,
            (SELECT COUNT(*) FROM interviews WHERE status = 'completed')     AS completed_interviews
        "#,
    )
    .fetch_one(&state.db)
    .await?;

    Ok(Json(DashboardStats {
        jobs: JobStats {
            total: counts.total_jobs,
            active: counts.active_jobs,
        },
        candidates: CandidateStats {
            total: counts.total_candidates,
            new: counts.new_candidates,
            hired: counts.hired_candidates,
            avg_score: rounded_average(counts.avg_score),
        },
        interviews: InterviewStats {
            scheduled: counts.scheduled_interviews,
            completed: counts.completed_interviews,
        },
    }))
}

/// GET /api/analytics/pipeline
pub async fn handle_pipeline(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<PipelineOverview>, AppError> {
    let pipeline = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM candidates GROUP BY status ORDER BY status",
    )
    .fetch_all(&state.db)
    .await?
    .into_iter()
    .map(|(status, count)| StatusCount { status, count })
    .collect();

    let stages = sqlx::query_as::<_, PipelineStageRow>(
        "SELECT * FROM pipeline_stages ORDER BY position ASC",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(PipelineOverview { pipeline, stages }))
}

/// GET /api/analytics/funnel
pub async fn handle_funnel(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<FunnelFilters>,
) -> Result<Json<Vec<StatusCount>>, AppError> {
    let start = optional_bound("startDate", filters.start_date.as_deref(), Bound::Start)?;
    let end = optional_bound("endDate", filters.end_date.as_deref(), Bound::End)?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT status, COUNT(*) FROM candidates WHERE TRUE");
    if let Some(job_id) = filters.job_id {
        qb.push(" AND job_posting_id = ").push_bind(job_id);
    }
    if let Some(start) = start {
        qb.push(" AND created_at >= ").push_bind(start);
    }
    if let Some(end) = end {
        qb.push(" AND created_at <= ").push_bind(end);
    }
    qb.push(" GROUP BY status");

    let counts: HashMap<String, i64> = qb
        .build_query_as::<(String, i64)>()
        .fetch_all(&state.db)
        .await?
        .into_iter()
        .collect();

    Ok(Json(ordered_funnel(&counts)))
}

/// GET /api/analytics/activity
pub async fn handle_activity(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityItem>>, AppError> {
    let limit = activity_limit(query.limit.as_deref());
    let take = limit as i64;

    let candidates = sqlx::query_as::<_, CandidateActivity>(
        r#"
        SELECT c.id, c.first_name, c.last_name, c.status, c.created_at, j.title AS job_title
        FROM candidates c
        JOIN job_postings j ON j.id = c.job_posting_id
        ORDER BY c.created_at DESC
        LIMIT $1
        "#,
    )
    .bind(take)
    .fetch_all(&state.db)
    .await?;

    let interviews = sqlx::query_as::<_, InterviewActivity>(
        r#"
        SELECT i.id, i.status, i.interview_type, i.created_at, c.first_name, c.last_name
        FROM interviews i
        JOIN candidates c ON c.id = i.candidate_id
        ORDER BY i.created_at DESC
        LIMIT $1
        "#,
    )
    .bind(take)
    .fetch_all(&state.db)
    .await?;

    let communications = sqlx::query_as::<_, CommunicationActivity>(
        r#"
        SELECT m.id, m.comm_type, m.subject, m.status, m.created_at, c.first_name, c.last_name
        FROM communications m
        JOIN candidates c ON c.id = m.candidate_id
        ORDER BY m.created_at DESC
        LIMIT $1
        "#,
    )
    .bind(take)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(merge_activity(
        candidates,
        interviews,
        communications,
        limit,
    )))
}

/// GET /api/analytics/sources
pub async fn handle_sources(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<SourceStats>>, AppError> {
    let rows = sqlx::query_as::<_, (Option<String>, i64, Option<f64>)>(
        r#"
        SELECT source, COUNT(*), AVG(ai_score)
        FROM candidates
        GROUP BY source
        ORDER BY COUNT(*) DESC, source ASC NULLS LAST
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(
        rows.into_iter()
            .map(|(source, count, avg)| SourceStats {
                source: source_label(source),
                count,
                avg_score: rounded_average(avg),
            })
            .collect(),
    ))
}

/// GET /api/analytics/time-to-hire
pub async fn handle_time_to_hire(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<TimeToHire>, AppError> {
    let hired = sqlx::query_as::<_, HiredCandidate>(
        r#"
        SELECT c.id, c.created_at, c.updated_at, j.title AS job_title, j.department
        FROM candidates c
        JOIN job_postings j ON j.id = c.job_posting_id
        WHERE c.status = 'hired'
        ORDER BY c.updated_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(time_to_hire(hired)))
}
