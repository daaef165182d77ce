//! Typed shapes of the JSON the model is asked to return, plus the inputs
//! serialized into prompts. Every field the model might omit is defaulted so a
//! partially-filled answer still deserializes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub score: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub years_experience: Option<f64>,
    #[serde(default)]
    pub current_title: Option<String>,
    #[serde(default)]
    pub current_company: Option<String>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    /// Models return the year as either a string or a number.
    #[serde(default)]
    pub year: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedScreeningQuestions {
    #[serde(default)]
    pub questions: Vec<ScreeningQuestionDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningQuestionDraft {
    pub question: String,
    #[serde(rename = "type", default = "default_question_type")]
    pub question_type: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub weight: Option<i32>,
    #[serde(default)]
    pub purpose: Option<String>,
}

fn default_question_type() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvaluation {
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub positives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewQuestionSet {
    #[serde(default)]
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    pub question: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub follow_up: Option<String>,
    #[serde(default)]
    pub ideal_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummary {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedEmail {
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedJobDescription {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub nice_to_have: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub salary_range: Option<SalaryRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRankings {
    #[serde(default)]
    pub rankings: Vec<CandidateRanking>,
    #[serde(default)]
    pub top_recommendation: Option<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRanking {
    pub candidate_id: String,
    pub rank: u32,
    pub score: f64,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAssessment {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time_limit: Option<i32>,
    #[serde(default)]
    pub questions: Vec<AssessmentQuestion>,
}

/// A single assessment question. Stored verbatim in `assessments.questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentQuestion {
    pub question: String,
    #[serde(rename = "type", default = "default_question_type")]
    pub question_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt inputs
// ────────────────────────────────────────────────────────────────────────────

/// Candidate facts handed to the interview-question prompt.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateProfile {
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub experience: Option<i32>,
    pub skills: Option<Value>,
    pub summary: Option<String>,
}

/// One entry of the candidate list handed to the ranking prompt.
#[derive(Debug, Clone, Serialize)]
pub struct RankingCandidate {
    pub id: String,
    pub name: String,
    pub summary: Option<String>,
    pub score: Option<f64>,
    pub experience: Option<i32>,
    pub skills: Option<Value>,
}

/// Ratings handed to the interview-summary prompt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRatings {
    pub overall_rating: Option<i32>,
    pub technical_score: Option<i32>,
    pub cultural_score: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resume_analysis_tolerates_missing_fields() {
        let analysis: ResumeAnalysis = serde_json::from_value(json!({
            "score": 82,
            "summary": "Solid backend engineer.",
            "education": [{"degree": "BSc", "school": "MIT", "year": 2015}]
        }))
        .unwrap();
        assert_eq!(analysis.score, 82.0);
        assert!(analysis.strengths.is_empty());
        assert!(analysis.years_experience.is_none());
        assert_eq!(analysis.education[0].year, Some(json!(2015)));
    }

    #[test]
    fn test_screening_question_type_defaults_to_text() {
        let q: ScreeningQuestionDraft =
            serde_json::from_value(json!({"question": "Why us?"})).unwrap();
        assert_eq!(q.question_type, "text");
        assert!(q.options.is_none());
    }

    #[test]
    fn test_rankings_use_camel_case() {
        let rankings: CandidateRankings = serde_json::from_value(json!({
            "rankings": [{"candidateId": "abc", "rank": 1, "score": 91.5, "reasoning": "best"}],
            "topRecommendation": "abc",
            "summary": "strong pool"
        }))
        .unwrap();
        assert_eq!(rankings.rankings[0].candidate_id, "abc");
        assert_eq!(rankings.top_recommendation.as_deref(), Some("abc"));
    }

    #[test]
    fn test_assessment_question_serializes_without_empty_fields() {
        let q = AssessmentQuestion {
            question: "What is 2+2?".into(),
            question_type: "text".into(),
            options: None,
            correct_answer: Some("4".into()),
            points: None,
            explanation: None,
        };
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(
            value,
            json!({"question": "What is 2+2?", "type": "text", "correctAnswer": "4"})
        );
    }
}
