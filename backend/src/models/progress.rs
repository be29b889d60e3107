// src/models/progress.rs

use serde::Serialize;
use sqlx::FromRow;

/// Represents the 'user_progress' table in the database.
/// At most one row exists per (user, exercise).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Progress {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub exercise_id: i64,

    /// Set on the first attempt and never cleared.
    pub completed: bool,

    /// 1 if the most recent attempt was correct, 0 otherwise.
    pub score: Option<i64>,

    pub last_answer: Option<String>,

    pub last_attempt_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// New state of a progress record after one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub is_correct: bool,
    pub completed: bool,
    pub score: i64,
    pub last_answer: String,

    /// Whether this submission earns points.
    pub award_points: bool,
}

/// Applies one answer to the prior progress record (if any).
///
/// Points are earned when the answer is correct and the previous attempt was
/// either missing, unscored, or wrong.
pub fn record_attempt(previous: Option<&Progress>, answer: &str, correct_answer: &str) -> Attempt {
    let is_correct = answer == correct_answer;
    let score = if is_correct { 1 } else { 0 };

    let award_points = match previous {
        Some(prev) => is_correct && matches!(prev.score, None | Some(0)),
        None => is_correct,
    };

    Attempt {
        is_correct,
        completed: true,
        score,
        last_answer: answer.to_string(),
        award_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn previous(score: Option<i64>) -> Progress {
        Progress {
            id: 1,
            user_id: 1,
            lesson_id: 1,
            exercise_id: 1,
            completed: true,
            score,
            last_answer: Some("3".to_string()),
            last_attempt_at: None,
        }
    }

    #[test]
    fn test_first_correct_attempt_awards() {
        let attempt = record_attempt(None, "2", "2");
        assert!(attempt.is_correct);
        assert!(attempt.completed);
        assert_eq!(attempt.score, 1);
        assert!(attempt.award_points);
    }

    #[test]
    fn test_first_incorrect_attempt_completes_without_award() {
        let attempt = record_attempt(None, "3", "2");
        assert!(!attempt.is_correct);
        assert!(attempt.completed);
        assert_eq!(attempt.score, 0);
        assert_eq!(attempt.last_answer, "3");
        assert!(!attempt.award_points);
    }

    #[test]
    fn test_repeat_correct_attempt_does_not_award() {
        let attempt = record_attempt(Some(&previous(Some(1))), "2", "2");
        assert_eq!(attempt.score, 1);
        assert!(!attempt.award_points);
    }

    #[test]
    fn test_correcting_a_wrong_or_unscored_attempt_awards() {
        assert!(record_attempt(Some(&previous(Some(0))), "2", "2").award_points);
        assert!(record_attempt(Some(&previous(None)), "2", "2").award_points);
    }

    #[test]
    fn test_wrong_after_right_drops_score_only() {
        let attempt = record_attempt(Some(&previous(Some(1))), "4", "2");
        assert!(attempt.completed);
        assert_eq!(attempt.score, 0);
        assert!(!attempt.award_points);
    }

    #[test]
    fn test_comparison_is_exact() {
        assert!(!record_attempt(None, " 2", "2").is_correct);
        assert!(!record_attempt(None, "Float", "float").is_correct);
    }
}
