//! Automatic grading of submitted assessments.

use serde::Deserialize;
use serde_json::Value;

/// Points a question is worth when it does not say.
pub const DEFAULT_POINTS: f64 = 10.0;
/// Scores are reported as a percentage.
pub const MAX_SCORE: i32 = 100;

/// The parts of a stored question that grading looks at.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GradedQuestion {
    #[serde(default)]
    points: Option<f64>,
    #[serde(default)]
    correct_answer: Option<Value>,
}

impl GradedQuestion {
    /// Fractional points are kept as given; only the final percentage is rounded.
    fn points(&self) -> f64 {
        match self.points {
            Some(p) if p > 0.0 && p.is_finite() => p,
            _ => DEFAULT_POINTS,
        }
    }

    fn expected(&self) -> Option<String> {
        match self.correct_answer.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Grades answers against the stored questions, matched by position.
///
/// An answer earns the question's points when it equals the correct answer,
/// ignoring case and surrounding whitespace. Questions without a correct
/// answer (open-ended ones) still count toward the maximum. Returns the
/// percentage rounded to the nearest integer, or 0 when nothing is gradable.
pub fn score_answers(questions: &Value, answers: &[Option<String>]) -> i32 {
    let Some(questions) = questions.as_array() else {
        return 0;
    };

    let mut earned = 0.0_f64;
    let mut possible = 0.0_f64;
    for (index, raw) in questions.iter().enumerate() {
        let question: GradedQuestion = serde_json::from_value(raw.clone()).unwrap_or_default();
        let points = question.points();
        possible += points;

        let answer = answers
            .get(index)
            .and_then(|a| a.as_deref())
            .map(str::trim)
            .filter(|a| !a.is_empty());
        let correct = match (answer, question.expected()) {
            (Some(given), Some(expected)) => given.to_lowercase() == expected.trim().to_lowercase(),
            _ => false,
        };
        if correct {
            earned += points;
        }
    }

    if possible <= 0.0 {
        return 0;
    }
    (earned / possible * f64::from(MAX_SCORE)).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answers(items: &[Option<&str>]) -> Vec<Option<String>> {
        items.iter().map(|a| a.map(String::from)).collect()
    }

    #[test]
    fn test_all_correct_scores_full_marks() {
        let questions = json!([
            {"question": "2+2?", "correctAnswer": "4"},
            {"question": "Capital of France?", "correctAnswer": "Paris"}
        ]);
        assert_eq!(score_answers(&questions, &answers(&[Some("4"), Some(" paris ")])), 100);
    }

    #[test]
    fn test_points_weight_the_score() {
        let questions = json!([
            {"correctAnswer": "a", "points": 30},
            {"correctAnswer": "b"}
        ]);
        // 30 of 40 points.
        assert_eq!(score_answers(&questions, &answers(&[Some("A"), Some("x")])), 75);
        // 10 of 40 points.
        assert_eq!(score_answers(&questions, &answers(&[None, Some("b")])), 25);
    }

    #[test]
    fn test_missing_answers_and_open_questions_score_zero() {
        let questions = json!([
            {"correctAnswer": "yes"},
            {"question": "Describe a project", "type": "text"},
            {"correctAnswer": "no"}
        ]);
        // One of three 10-point questions right.
        assert_eq!(score_answers(&questions, &answers(&[Some("yes")])), 33);
    }

    #[test]
    fn test_non_string_correct_answers_compare_as_text() {
        let questions = json!([{"correctAnswer": 42, "points": 5}]);
        assert_eq!(score_answers(&questions, &answers(&[Some("42")])), 100);
    }

    #[test]
    fn test_no_questions_scores_zero() {
        assert_eq!(score_answers(&json!([]), &answers(&[Some("a")])), 0);
        assert_eq!(score_answers(&Value::Null, &[]), 0);
    }

    #[test]
    fn test_zero_points_fall_back_to_default() {
        let questions = json!([{"correctAnswer": "a", "points": 0}, {"correctAnswer": "b"}]);
        assert_eq!(score_answers(&questions, &answers(&[Some("a"), None])), 50);
    }

    #[test]
    fn test_fractional_points_are_not_rounded_away() {
        let single = json!([{"correctAnswer": "a", "points": 0.4}]);
        assert_eq!(score_answers(&single, &answers(&[Some("a")])), 100);

        // 1.5 of 4 points is 37.5%.
        let mixed = json!([
            {"correctAnswer": "a", "points": 1.5},
            {"correctAnswer": "b", "points": 2.5}
        ]);
        assert_eq!(score_answers(&mixed, &answers(&[Some("a"), Some("x")])), 38);
    }
}
