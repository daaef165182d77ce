//! AI operations. Each one fills a prompt template, calls the model through
//! `LlmClient::call_json` and returns the typed answer.

use crate::ai::models::{
    AnswerEvaluation, CandidateProfile, GeneratedAssessment, GeneratedEmail,
    GeneratedJobDescription, GeneratedScreeningQuestions, InterviewQuestionSet, InterviewRatings,
    InterviewSummary, ResumeAnalysis,
};
use crate::ai::prompts::*;
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, optional_line, system_prompt};
use crate::llm_client::LlmClient;

/// Scores a resume against a job description.
pub async fn analyze_resume(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
) -> Result<ResumeAnalysis, AppError> {
    let prompt = fill_template(
        RESUME_ANALYSIS_PROMPT,
        &[
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    );
    llm.call_json(
        &prompt,
        &system_prompt(RESUME_ANALYSIS_PERSONA),
        RESUME_ANALYSIS_OPTIONS,
    )
    .await
    .map_err(|e| AppError::llm("Failed to analyze resume", e))
}

pub async fn generate_screening_questions(
    llm: &LlmClient,
    job_title: &str,
    job_description: &str,
    count: u32,
) -> Result<GeneratedScreeningQuestions, AppError> {
    let count = count.to_string();
    let prompt = fill_template(
        SCREENING_QUESTIONS_PROMPT,
        &[
            ("count", &count),
            ("job_title", job_title),
            ("job_description", job_description),
        ],
    );
    llm.call_json(
        &prompt,
        &system_prompt(SCREENING_QUESTIONS_PERSONA),
        SCREENING_QUESTIONS_OPTIONS,
    )
    .await
    .map_err(|e| AppError::llm("Failed to generate screening questions", e))
}

pub async fn score_screening_answer(
    llm: &LlmClient,
    question: &str,
    answer: &str,
    job_context: &str,
) -> Result<AnswerEvaluation, AppError> {
    let prompt = fill_template(
        ANSWER_SCORING_PROMPT,
        &[
            ("question", question),
            ("answer", answer),
            ("job_context", job_context),
        ],
    );
    llm.call_json(
        &prompt,
        &system_prompt(ANSWER_SCORING_PERSONA),
        ANSWER_SCORING_OPTIONS,
    )
    .await
    .map_err(|e| AppError::llm("Failed to score screening answer", e))
}

pub async fn generate_interview_questions(
    llm: &LlmClient,
    candidate: &CandidateProfile,
    job_description: &str,
    interview_type: &str,
) -> Result<InterviewQuestionSet, AppError> {
    let candidate_info = serde_json::to_string_pretty(candidate)
        .map_err(|e| AppError::Internal(e.into()))?;
    let prompt = fill_template(
        INTERVIEW_QUESTIONS_PROMPT,
        &[
            ("interview_type", interview_type),
            ("candidate_info", &candidate_info),
            ("job_description", job_description),
        ],
    );
    llm.call_json(
        &prompt,
        &system_prompt(INTERVIEW_QUESTIONS_PERSONA),
        INTERVIEW_QUESTIONS_OPTIONS,
    )
    .await
    .map_err(|e| AppError::llm("Failed to generate interview questions", e))
}

pub async fn summarize_interview(
    llm: &LlmClient,
    notes: &str,
    ratings: &InterviewRatings,
) -> Result<InterviewSummary, AppError> {
    let ratings =
        serde_json::to_string_pretty(ratings).map_err(|e| AppError::Internal(e.into()))?;
    let prompt = fill_template(
        INTERVIEW_SUMMARY_PROMPT,
        &[("notes", notes), ("ratings", &ratings)],
    );
    llm.call_json(
        &prompt,
        &system_prompt(INTERVIEW_SUMMARY_PERSONA),
        INTERVIEW_SUMMARY_OPTIONS,
    )
    .await
    .map_err(|e| AppError::llm("Failed to summarize interview", e))
}

/// Recipient details for a drafted email.
pub struct EmailRecipient<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub position: Option<&'a str>,
}

pub async fn generate_email(
    llm: &LlmClient,
    template_type: &str,
    recipient: &EmailRecipient<'_>,
    custom_context: Option<&str>,
) -> Result<GeneratedEmail, AppError> {
    let custom_context = optional_line("Additional Context", custom_context);
    let prompt = fill_template(
        EMAIL_PROMPT,
        &[
            ("instruction", email_instruction(template_type)),
            ("first_name", recipient.first_name),
            ("last_name", recipient.last_name),
            ("position", recipient.position.unwrap_or("the position")),
            ("custom_context", &custom_context),
        ],
    );
    llm.call_json(&prompt, &system_prompt(EMAIL_PERSONA), EMAIL_OPTIONS)
        .await
        .map_err(|e| AppError::llm("Failed to generate email", e))
}

/// Basic facts a job description is generated from.
pub struct JobOutline<'a> {
    pub title: &'a str,
    pub department: &'a str,
    pub location: &'a str,
    pub job_type: &'a str,
    pub notes: Option<&'a str>,
}

pub async fn generate_job_description(
    llm: &LlmClient,
    outline: &JobOutline<'_>,
) -> Result<GeneratedJobDescription, AppError> {
    let notes = optional_line("Additional Notes", outline.notes);
    let prompt = fill_template(
        JOB_DESCRIPTION_PROMPT,
        &[
            ("title", outline.title),
            ("department", outline.department),
            ("location", outline.location),
            ("job_type", outline.job_type),
            ("notes", &notes),
        ],
    );
    llm.call_json(
        &prompt,
        &system_prompt(JOB_DESCRIPTION_PERSONA),
        JOB_DESCRIPTION_OPTIONS,
    )
    .await
    .map_err(|e| AppError::llm("Failed to generate job description", e))
}

pub async fn generate_assessment(
    llm: &LlmClient,
    assessment_type: &str,
    job_title: &str,
    skills: Option<&str>,
    difficulty: &str,
) -> Result<GeneratedAssessment, AppError> {
    let prompt = fill_template(
        ASSESSMENT_PROMPT,
        &[
            ("assessment_type", assessment_type),
            ("job_title", job_title),
            ("skills", skills.unwrap_or("general")),
            ("difficulty", difficulty),
        ],
    );
    llm.call_json(
        &prompt,
        &system_prompt(ASSESSMENT_PERSONA),
        ASSESSMENT_OPTIONS,
    )
    .await
    .map_err(|e| AppError::llm("Failed to generate assessment", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> LlmClient {
        LlmClient::new(
            "key".to_string(),
            server.url("/v1"),
            "test-model".to_string(),
        )
        .expect("client")
    }

    fn completion(content: serde_json::Value) -> serde_json::Value {
        json!({ "choices": [{ "message": { "content": content.to_string() } }] })
    }

    #[tokio::test]
    async fn analyze_resume_embeds_resume_and_job_description() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .body_contains("Rust backend, 6 years")
                    .body_contains("Senior Platform Engineer");
                then.status(200).json_body(completion(json!({
                    "score": 88,
                    "summary": "Strong match.",
                    "strengths": ["Rust"],
                    "weaknesses": [],
                    "skills": ["Rust", "Postgres"],
                    "yearsExperience": 6,
                    "recommendation": "hire"
                })));
            })
            .await;

        let analysis = analyze_resume(
            &client(&server),
            "Rust backend, 6 years",
            "Senior Platform Engineer",
        )
        .await
        .expect("analysis");

        mock.assert_async().await;
        assert_eq!(analysis.score, 88.0);
        assert_eq!(analysis.years_experience, Some(6.0));
        assert_eq!(analysis.recommendation, "hire");
    }

    #[tokio::test]
    async fn generate_email_uses_template_instruction() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .body_contains("respectful, encouraging rejection")
                    .body_contains("Position: the position")
                    .body_contains("Additional Context: keep it short");
                then.status(200).json_body(completion(json!({
                    "subject": "Your application",
                    "body": "Dear Ada, ...",
                    "tone": "warm"
                })));
            })
            .await;

        let email = generate_email(
            &client(&server),
            "rejection",
            &EmailRecipient {
                first_name: "Ada",
                last_name: "Lovelace",
                position: None,
            },
            Some("keep it short"),
        )
        .await
        .expect("email");

        mock.assert_async().await;
        assert_eq!(email.subject, "Your application");
    }

    #[tokio::test]
    async fn malformed_output_maps_to_llm_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200)
                    .json_body(json!({ "choices": [{ "message": { "content": "not json" } }] }));
            })
            .await;

        let err = generate_assessment(&client(&server), "technical", "Engineer", None, "medium")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
