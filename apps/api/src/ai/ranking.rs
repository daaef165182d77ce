//! Candidate ranking: a pluggable, trait-based ranker over a job's applicants.
//!
//! Default: `LlmRanker` (asks the model to compare the pool).
//! Fallback: `ScoreRanker` (deterministic ordering by stored resume score), selected
//! with `ENABLE_LLM_RANKING=false`.
//!
//! `AppState` holds an `Arc<dyn CandidateRanker>`, chosen at startup via config.

use std::cmp::Ordering;

use async_trait::async_trait;

use crate::ai::models::{CandidateRanking, CandidateRankings, RankingCandidate};
use crate::ai::prompts::{RANKING_OPTIONS, RANKING_PERSONA, RANKING_PROMPT};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, system_prompt};
use crate::llm_client::LlmClient;

/// The ranking trait. Implement this to swap backends without touching the handler.
#[async_trait]
pub trait CandidateRanker: Send + Sync {
    async fn rank(
        &self,
        candidates: &[RankingCandidate],
        job_description: &str,
    ) -> Result<CandidateRankings, AppError>;

    fn backend(&self) -> &'static str;
}

pub struct LlmRanker {
    llm: LlmClient,
}

impl LlmRanker {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CandidateRanker for LlmRanker {
    async fn rank(
        &self,
        candidates: &[RankingCandidate],
        job_description: &str,
    ) -> Result<CandidateRankings, AppError> {
        let candidates_json =
            serde_json::to_string_pretty(candidates).map_err(|e| AppError::Internal(e.into()))?;
        let prompt = fill_template(
            RANKING_PROMPT,
            &[
                ("job_description", job_description),
                ("candidates", &candidates_json),
            ],
        );
        self.llm
            .call_json(&prompt, &system_prompt(RANKING_PERSONA), RANKING_OPTIONS)
            .await
            .map_err(|e| AppError::llm("Failed to rank candidates", e))
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

/// Orders candidates by resume score (desc), then experience (desc), then name.
/// Unscored candidates sort last with a score of 0.
pub struct ScoreRanker;

#[async_trait]
impl CandidateRanker for ScoreRanker {
    async fn rank(
        &self,
        candidates: &[RankingCandidate],
        _job_description: &str,
    ) -> Result<CandidateRankings, AppError> {
        Ok(rank_by_score(candidates))
    }

    fn backend(&self) -> &'static str {
        "score"
    }
}

pub fn rank_by_score(candidates: &[RankingCandidate]) -> CandidateRankings {
    let mut ordered: Vec<&RankingCandidate> = candidates.iter().collect();
    ordered.sort_by(|a, b| {
        let by_score = b
            .score
            .unwrap_or(-1.0)
            .partial_cmp(&a.score.unwrap_or(-1.0))
            .unwrap_or(Ordering::Equal);
        by_score
            .then_with(|| b.experience.unwrap_or(0).cmp(&a.experience.unwrap_or(0)))
            .then_with(|| a.name.cmp(&b.name))
    });

    let rankings: Vec<CandidateRanking> = ordered
        .iter()
        .enumerate()
        .map(|(i, c)| CandidateRanking {
            candidate_id: c.id.clone(),
            rank: i as u32 + 1,
            score: c.score.unwrap_or(0.0),
            reasoning: match c.score {
                Some(score) => format!("Resume score {score:.0}"),
                None => "Resume not yet analyzed".to_string(),
            },
        })
        .collect();

    let scored = candidates.iter().filter(|c| c.score.is_some()).count();
    CandidateRankings {
        top_recommendation: rankings.first().map(|r| r.candidate_id.clone()),
        summary: format!(
            "Ranked {} candidates by resume score ({} analyzed).",
            candidates.len(),
            scored
        ),
        rankings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, name: &str, score: Option<f64>, experience: Option<i32>) -> RankingCandidate {
        RankingCandidate {
            id: id.to_string(),
            name: name.to_string(),
            summary: None,
            score,
            experience,
            skills: None,
        }
    }

    #[test]
    fn test_rank_by_score_orders_descending() {
        let pool = vec![
            candidate("a", "Ann", Some(70.0), Some(3)),
            candidate("b", "Bob", Some(92.0), Some(5)),
            candidate("c", "Cy", Some(85.0), Some(8)),
        ];
        let result = rank_by_score(&pool);
        let ids: Vec<_> = result.rankings.iter().map(|r| r.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(result.rankings[0].rank, 1);
        assert_eq!(result.top_recommendation.as_deref(), Some("b"));
    }

    #[test]
    fn test_unscored_candidates_rank_last() {
        let pool = vec![
            candidate("a", "Ann", None, Some(20)),
            candidate("b", "Bob", Some(10.0), None),
        ];
        let result = rank_by_score(&pool);
        assert_eq!(result.rankings[0].candidate_id, "b");
        assert_eq!(result.rankings[1].score, 0.0);
        assert_eq!(result.rankings[1].reasoning, "Resume not yet analyzed");
        assert!(result.summary.contains("(1 analyzed)"));
    }

    #[test]
    fn test_ties_break_on_experience_then_name() {
        let pool = vec![
            candidate("z", "Zed", Some(80.0), Some(2)),
            candidate("y", "Amy", Some(80.0), Some(2)),
            candidate("x", "Max", Some(80.0), Some(9)),
        ];
        let ids: Vec<_> = rank_by_score(&pool)
            .rankings
            .into_iter()
            .map(|r| r.candidate_id)
            .collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_score_ranker_backend() {
        let ranker = ScoreRanker;
        assert_eq!(ranker.backend(), "score");
        let result = ranker
            .rank(&[candidate("a", "Ann", Some(50.0), None)], "any")
            .await
            .unwrap();
        assert_eq!(result.rankings.len(), 1);
    }
}
