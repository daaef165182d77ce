//! Pure shaping of analytics query results.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::dates::rounded_days;
use crate::models::candidate::CANDIDATE_STATUSES;

pub const DEFAULT_ACTIVITY_LIMIT: usize = 20;
pub const MAX_ACTIVITY_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Candidate counts in funnel order. Statuses nobody is in count as 0.
pub fn ordered_funnel(counts: &HashMap<String, i64>) -> Vec<StatusCount> {
    CANDIDATE_STATUSES
        .iter()
        .map(|status| StatusCount {
            status: status.to_string(),
            count: counts.get(*status).copied().unwrap_or(0),
        })
        .collect()
}

/// Rounds a mean score for display; no data averages to 0.
pub fn rounded_average(avg: Option<f64>) -> i64 {
    avg.unwrap_or(0.0).round() as i64
}

pub fn source_label(source: Option<String>) -> String {
    source
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Parses the `limit` query parameter. Missing or unparsable values use the default.
pub fn activity_limit(raw: Option<&str>) -> usize {
    raw.and_then(|r| r.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .min(MAX_ACTIVITY_LIMIT)
}

// ────────────────────────────────────────────────────────────────────────────
// Activity feed
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CandidateActivity {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub job_title: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct InterviewActivity {
    pub id: Uuid,
    pub status: String,
    pub interview_type: String,
    pub created_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommunicationActivity {
    pub id: Uuid,
    pub comm_type: String,
    pub subject: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
}

impl From<CandidateActivity> for ActivityItem {
    fn from(c: CandidateActivity) -> Self {
        ActivityItem {
            kind: "candidate",
            id: c.id,
            title: format!("New candidate: {} {}", c.first_name, c.last_name),
            description: format!("Applied for {}", c.job_title),
            status: c.status,
            created_at: c.created_at,
        }
    }
}

impl From<InterviewActivity> for ActivityItem {
    fn from(i: InterviewActivity) -> Self {
        ActivityItem {
            kind: "interview",
            id: i.id,
            title: format!("Interview {}: {} {}", i.status, i.first_name, i.last_name),
            description: format!("{} interview", i.interview_type),
            status: i.status,
            created_at: i.created_at,
        }
    }
}

impl From<CommunicationActivity> for ActivityItem {
    fn from(c: CommunicationActivity) -> Self {
        ActivityItem {
            kind: "communication",
            id: c.id,
            title: format!("{} {}: {} {}", c.comm_type, c.status, c.first_name, c.last_name),
            description: c
                .subject
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "No subject".to_string()),
            status: c.status,
            created_at: c.created_at,
        }
    }
}

/// Merges the per-table feeds, newest first, keeping at most `limit` items.
pub fn merge_activity(
    candidates: Vec<CandidateActivity>,
    interviews: Vec<InterviewActivity>,
    communications: Vec<CommunicationActivity>,
    limit: usize,
) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = candidates
        .into_iter()
        .map(ActivityItem::from)
        .chain(interviews.into_iter().map(ActivityItem::from))
        .chain(communications.into_iter().map(ActivityItem::from))
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit);
    items
}

// ────────────────────────────────────────────────────────────────────────────
// Time to hire
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow)]
pub struct HiredCandidate {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub job_title: String,
    pub department: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HireDetail {
    pub candidate_id: Uuid,
    pub job_title: String,
    pub department: String,
    pub days_to_hire: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeToHire {
    pub avg_days_to_hire: i64,
    pub details: Vec<HireDetail>,
}

/// Days from application to the last update of each hired candidate, and their rounded mean.
pub fn time_to_hire(hired: Vec<HiredCandidate>) -> TimeToHire {
    let details: Vec<HireDetail> = hired
        .into_iter()
        .map(|c| HireDetail {
            candidate_id: c.id,
            days_to_hire: rounded_days(c.created_at, c.updated_at),
            job_title: c.job_title,
            department: c.department,
        })
        .collect();

    let avg_days_to_hire = if details.is_empty() {
        0
    } else {
        let total: i64 = details.iter().map(|d| d.days_to_hire).sum();
        (total as f64 / details.len() as f64).round() as i64
    };

    TimeToHire {
        avg_days_to_hire,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_funnel_is_fixed_order_with_zero_fill() {
        let counts = HashMap::from([("hired".to_string(), 2), ("new".to_string(), 7)]);
        let funnel = ordered_funnel(&counts);
        let statuses: Vec<&str> = funnel.iter().map(|s| s.status.as_str()).collect();
        assert_eq!(
            statuses,
            ["new", "screening", "interviewed", "offered", "hired", "rejected"]
        );
        assert_eq!(funnel[0].count, 7);
        assert_eq!(funnel[1].count, 0);
        assert_eq!(funnel[4].count, 2);
    }

    #[test]
    fn test_rounded_average_and_source_label() {
        assert_eq!(rounded_average(Some(72.5)), 73);
        assert_eq!(rounded_average(None), 0);
        assert_eq!(source_label(None), "Unknown");
        assert_eq!(source_label(Some("LinkedIn".into())), "LinkedIn");
    }

    #[test]
    fn test_activity_limit_parsing() {
        assert_eq!(activity_limit(None), 20);
        assert_eq!(activity_limit(Some("5")), 5);
        assert_eq!(activity_limit(Some("abc")), 20);
        assert_eq!(activity_limit(Some("0")), 20);
        assert_eq!(activity_limit(Some("5000")), 100);
    }

    #[test]
    fn test_merge_activity_sorts_newest_first_and_truncates() {
        let candidates = vec![CandidateActivity {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            status: "new".into(),
            created_at: at(9),
            job_title: "Engineer".into(),
        }];
        let interviews = vec![InterviewActivity {
            id: Uuid::new_v4(),
            status: "scheduled".into(),
            interview_type: "video".into(),
            created_at: at(11),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        }];
        let communications = vec![CommunicationActivity {
            id: Uuid::new_v4(),
            comm_type: "email".into(),
            subject: None,
            status: "sent".into(),
            created_at: at(10),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        }];

        let feed = merge_activity(candidates, interviews, communications, 2);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].kind, "interview");
        assert_eq!(feed[0].title, "Interview scheduled: Ada Lovelace");
        assert_eq!(feed[0].description, "video interview");
        assert_eq!(feed[1].kind, "communication");
        assert_eq!(feed[1].title, "email sent: Ada Lovelace");
        assert_eq!(feed[1].description, "No subject");
    }

    #[test]
    fn test_time_to_hire_rounds_days_and_mean() {
        let hired = |days: i64, hours: i64| HiredCandidate {
            id: Uuid::new_v4(),
            created_at: at(0),
            updated_at: at(0) + Duration::days(days) + Duration::hours(hours),
            job_title: "Engineer".into(),
            department: "R&D".into(),
        };
        let report = time_to_hire(vec![hired(10, 13), hired(20, 0)]);
        assert_eq!(report.details[0].days_to_hire, 11);
        assert_eq!(report.details[1].days_to_hire, 20);
        // (11 + 20) / 2 = 15.5
        assert_eq!(report.avg_days_to_hire, 16);
    }

    #[test]
    fn test_time_to_hire_empty() {
        let report = time_to_hire(Vec::new());
        assert_eq!(report.avg_days_to_hire, 0);
        assert!(report.details.is_empty());
    }
}
