// src/models/exercise.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MULTIPLE_CHOICE: &str = "multiple_choice";

/// Represents the 'exercises' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Exercise {
    pub id: i64,
    pub lesson_id: i64,

    /// Only `multiple_choice` is populated.
    pub exercise_type: String,

    pub question: String,

    /// JSON array of option strings, kept as raw text.
    /// A row can hold a value that does not parse; see [`Exercise::parse_options`].
    pub options: String,

    /// Expected to be one of `options`; not enforced.
    pub correct_answer: String,

    /// Sequence within the lesson. Ties fall back to `id`.
    pub position: i64,
}

impl Exercise {
    /// Decodes the stored option list.
    pub fn parse_options(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_str(&self.options)
    }
}

/// DTO for sending an exercise to the client (excludes the correct answer).
#[derive(Debug, Serialize)]
pub struct PublicExercise {
    pub id: i64,
    #[serde(rename = "type")]
    pub exercise_type: String,
    pub question: String,
    pub options: Vec<String>,
}

impl PublicExercise {
    pub fn new(exercise: &Exercise, options: Vec<String>) -> Self {
        Self {
            id: exercise.id,
            exercise_type: exercise.exercise_type.clone(),
            question: exercise.question.clone(),
            options,
        }
    }
}

/// DTO for answering an exercise.
///
/// `answer` is optional so that "nothing selected" reaches the handler as a
/// validation failure instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitExerciseRequest {
    #[serde(default)]
    pub answer: Option<String>,
}

/// Result of a submission, pointing the client back at the lesson.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub correct: bool,
    pub awarded_new_points: bool,
    pub points_awarded: i64,
    pub correct_answer: String,
    pub category: &'static str,
    pub message: String,
    pub total_points: i64,
    pub current_streak: i64,
    pub lesson_id: i64,
    pub redirect_to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise_with_options(options: &str) -> Exercise {
        Exercise {
            id: 1,
            lesson_id: 1,
            exercise_type: MULTIPLE_CHOICE.to_string(),
            question: "1 + 1 = ?".to_string(),
            options: options.to_string(),
            correct_answer: "2".to_string(),
            position: 0,
        }
    }

    #[test]
    fn test_parse_options_keeps_order() {
        let exercise = exercise_with_options(r#"["1","2","3","4"]"#);
        assert_eq!(exercise.parse_options().unwrap(), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_parse_options_rejects_corrupt_value() {
        assert!(exercise_with_options("[\"1\", \"2\"").parse_options().is_err());
        assert!(exercise_with_options(r#"{"a": 1}"#).parse_options().is_err());
    }
}
