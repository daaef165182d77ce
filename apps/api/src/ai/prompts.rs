// Prompt templates for every AI operation.
// Placeholders use `{name}` and are filled with `llm_client::prompts::fill_template`.

use crate::llm_client::CallOptions;

// ────────────────────────────────────────────────────────────────────────────
// Resume analysis
// ────────────────────────────────────────────────────────────────────────────

pub const RESUME_ANALYSIS_PERSONA: &str = "You are an expert HR recruiter and resume analyst. \
Analyze resumes objectively and provide structured assessments.";

pub const RESUME_ANALYSIS_OPTIONS: CallOptions = CallOptions::new(0.3, 1500);

pub const RESUME_ANALYSIS_PROMPT: &str = r#"Analyze this resume against the job description and provide a detailed assessment.

Job Description:
{job_description}

Resume:
{resume_text}

Provide your analysis in this exact JSON format:
{
  "score": <number 0-100>,
  "summary": "<2-3 sentence summary of the candidate>",
  "strengths": ["<strength 1>", "<strength 2>", "<strength 3>"],
  "weaknesses": ["<weakness 1>", "<weakness 2>"],
  "skills": ["<skill 1>", "<skill 2>"],
  "yearsExperience": <number>,
  "currentTitle": "<current job title>",
  "currentCompany": "<current company>",
  "education": [{"degree": "<degree>", "school": "<school>", "year": "<year>"}],
  "recommendation": "<hire|consider|reject>",
  "reasoning": "<brief explanation of recommendation>"
}"#;

// ────────────────────────────────────────────────────────────────────────────
// Screening questions
// ────────────────────────────────────────────────────────────────────────────

pub const SCREENING_QUESTIONS_PERSONA: &str = "You are an expert HR recruiter specializing in \
creating effective screening questions. Generate questions that help identify the best candidates.";

pub const SCREENING_QUESTIONS_OPTIONS: CallOptions = CallOptions::new(0.7, 1500);

pub const SCREENING_QUESTIONS_PROMPT: &str = r#"Generate {count} screening questions for this position:

Job Title: {job_title}
Job Description: {job_description}

Provide questions in this exact JSON format:
{
  "questions": [
    {
      "question": "<question text>",
      "type": "<text|multiple_choice|yes_no|rating>",
      "options": ["<option1>", "<option2>"],
      "weight": <1-5 importance>,
      "purpose": "<what this question assesses>"
    }
  ]
}
Only include "options" for multiple_choice questions."#;

// ────────────────────────────────────────────────────────────────────────────
// Screening answer scoring
// ────────────────────────────────────────────────────────────────────────────

pub const ANSWER_SCORING_PERSONA: &str = "You are an expert HR recruiter evaluating candidate \
responses. Score answers objectively.";

pub const ANSWER_SCORING_OPTIONS: CallOptions = CallOptions::new(0.3, 500);

pub const ANSWER_SCORING_PROMPT: &str = r#"Evaluate this screening answer:

Question: {question}
Candidate's Answer: {answer}
Job Context: {job_context}

Provide your evaluation in this exact JSON format:
{
  "score": <number 0-100>,
  "feedback": "<brief feedback on the answer>",
  "redFlags": ["<any concerns>"],
  "positives": ["<positive aspects>"]
}"#;

// ────────────────────────────────────────────────────────────────────────────
// Interview questions
// ────────────────────────────────────────────────────────────────────────────

pub const INTERVIEW_QUESTIONS_PERSONA: &str = "You are an expert interviewer who creates \
insightful, role-specific interview questions.";

pub const INTERVIEW_QUESTIONS_OPTIONS: CallOptions = CallOptions::new(0.7, 2000);

pub const INTERVIEW_QUESTIONS_PROMPT: &str = r#"Generate interview questions for this {interview_type} interview:

Candidate Information:
{candidate_info}

Job Description:
{job_description}

Generate 8-10 questions in this exact JSON format:
{
  "questions": [
    {
      "question": "<question text>",
      "category": "<technical|behavioral|situational|cultural>",
      "difficulty": "<easy|medium|hard>",
      "followUp": "<potential follow-up question>",
      "idealAnswer": "<key points to look for>"
    }
  ]
}"#;

// ────────────────────────────────────────────────────────────────────────────
// Interview summary
// ────────────────────────────────────────────────────────────────────────────

pub const INTERVIEW_SUMMARY_PERSONA: &str = "You are an expert HR analyst who summarizes \
interview feedback objectively.";

pub const INTERVIEW_SUMMARY_OPTIONS: CallOptions = CallOptions::new(0.3, 800);

pub const INTERVIEW_SUMMARY_PROMPT: &str = r#"Summarize this interview:

Interview Notes:
{notes}

Ratings:
{ratings}

Provide a summary in this exact JSON format:
{
  "summary": "<comprehensive 3-4 sentence summary>",
  "strengths": ["<strength 1>", "<strength 2>"],
  "concerns": ["<concern 1>", "<concern 2>"],
  "recommendation": "<strong_hire|hire|consider|no_hire>",
  "nextSteps": ["<recommended next step>"]
}"#;

// ────────────────────────────────────────────────────────────────────────────
// Email drafting
// ────────────────────────────────────────────────────────────────────────────

pub const EMAIL_PERSONA: &str = "You are an expert HR communications specialist. \
Write professional, warm, and clear emails.";

pub const EMAIL_OPTIONS: CallOptions = CallOptions::new(0.7, 1000);

pub const EMAIL_PROMPT: &str = r#"{instruction}

Candidate: {first_name} {last_name}
Position: {position}
{custom_context}

Provide the email in this exact JSON format:
{
  "subject": "<email subject line>",
  "body": "<full email body with proper formatting>",
  "tone": "<professional|warm|formal>"
}"#;

const GENERIC_EMAIL_INSTRUCTION: &str = "Write a professional HR email.";

/// Maps a template type to the drafting instruction. Unknown types get a generic one.
pub fn email_instruction(template_type: &str) -> &'static str {
    match template_type {
        "application_received" => {
            "Write a professional email acknowledging receipt of a job application."
        }
        "interview_invite" => {
            "Write a warm, professional email inviting the candidate to an interview."
        }
        "rejection" => "Write a respectful, encouraging rejection email.",
        "offer" => "Write an exciting job offer email.",
        "follow_up" => "Write a follow-up email to check on the candidate's interest.",
        _ => GENERIC_EMAIL_INSTRUCTION,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job description
// ────────────────────────────────────────────────────────────────────────────

pub const JOB_DESCRIPTION_PERSONA: &str = "You are an expert HR professional who writes \
compelling, inclusive job descriptions.";

pub const JOB_DESCRIPTION_OPTIONS: CallOptions = CallOptions::new(0.7, 1500);

pub const JOB_DESCRIPTION_PROMPT: &str = r#"Generate a comprehensive job description:

Job Title: {title}
Department: {department}
Location: {location}
Type: {job_type}
{notes}

Provide the job description in this exact JSON format:
{
  "title": "<refined job title>",
  "summary": "<2-3 sentence role summary>",
  "responsibilities": ["<responsibility 1>", "<responsibility 2>"],
  "requirements": ["<requirement 1>", "<requirement 2>"],
  "niceToHave": ["<nice to have 1>", "<nice to have 2>"],
  "benefits": ["<benefit 1>", "<benefit 2>"],
  "salaryRange": {"min": <number>, "max": <number>}
}"#;

// ────────────────────────────────────────────────────────────────────────────
// Candidate ranking
// ────────────────────────────────────────────────────────────────────────────

pub const RANKING_PERSONA: &str = "You are an expert HR analyst who objectively ranks candidates.";

pub const RANKING_OPTIONS: CallOptions = CallOptions::new(0.3, 1500);

pub const RANKING_PROMPT: &str = r#"Rank these candidates for the position:

Job Description:
{job_description}

Candidates:
{candidates}

Provide rankings in this exact JSON format:
{
  "rankings": [
    {
      "candidateId": "<id>",
      "rank": <number>,
      "score": <0-100>,
      "reasoning": "<brief explanation>"
    }
  ],
  "topRecommendation": "<candidateId of top choice>",
  "summary": "<overall assessment of candidate pool>"
}"#;

// ────────────────────────────────────────────────────────────────────────────
// Assessment generation
// ────────────────────────────────────────────────────────────────────────────

pub const ASSESSMENT_PERSONA: &str = "You are an expert at creating professional assessments. \
Generate challenging but fair questions.";

pub const ASSESSMENT_OPTIONS: CallOptions = CallOptions::new(0.7, 2500);

pub const ASSESSMENT_PROMPT: &str = r#"Generate a {assessment_type} assessment for:

Job: {job_title}
Skills Required: {skills}
Difficulty: {difficulty}

Generate 10 questions in this exact JSON format:
{
  "title": "<assessment title>",
  "description": "<brief description>",
  "timeLimit": <minutes>,
  "questions": [
    {
      "question": "<question text>",
      "type": "<multiple_choice|code|text>",
      "options": ["<option>"],
      "correctAnswer": "<correct answer or key points>",
      "points": <number>,
      "explanation": "<explanation of correct answer>"
    }
  ]
}
Only include "options" for multiple_choice questions."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_email_instructions() {
        assert!(email_instruction("rejection").contains("rejection"));
        assert!(email_instruction("offer").contains("offer"));
        assert!(email_instruction("interview_invite").contains("interview"));
    }

    #[test]
    fn test_unknown_email_type_falls_back() {
        assert_eq!(email_instruction("newsletter"), GENERIC_EMAIL_INSTRUCTION);
    }

    #[test]
    fn test_sampling_parameters() {
        assert_eq!(RESUME_ANALYSIS_OPTIONS.max_tokens, 1500);
        assert_eq!(ANSWER_SCORING_OPTIONS.max_tokens, 500);
        assert_eq!(ASSESSMENT_OPTIONS.max_tokens, 2500);
        assert!((INTERVIEW_SUMMARY_OPTIONS.temperature - 0.3).abs() < f32::EPSILON);
    }
}
