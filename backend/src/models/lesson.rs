// src/models/lesson.rs

use serde::Serialize;
use sqlx::FromRow;

use crate::models::{exercise::PublicExercise, progress::Progress};

pub const LESSON_COMPLETE_MESSAGE: &str =
    "Congratulations! You have completed all exercises for this lesson.";

/// Represents the 'lessons' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: i64,
    pub title: String,

    /// HTML body of the lesson. Sanitized before it leaves the API.
    pub content: Option<String>,

    pub course_id: i64,

    /// Display order within the course.
    pub order: i64,
}

/// Lesson row as listed on a course page (no content body).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LessonSummary {
    pub id: i64,
    pub title: String,
    pub order: i64,
}

/// A transient, user-visible notice attached to a response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FlashMessage {
    /// One of `success`, `info`, `warning`, `danger`.
    pub category: &'static str,
    pub message: String,
}

impl FlashMessage {
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            category: "danger",
            message: message.into(),
        }
    }
}

/// Everything needed to render the lesson page for one user.
#[derive(Debug, Serialize)]
pub struct LessonView {
    pub lesson: Lesson,

    /// The next exercise to answer, or `None` when there is nothing left to present.
    pub exercise: Option<PublicExercise>,

    /// Any earlier attempt on `exercise`, for display only.
    pub progress: Option<Progress>,

    pub lesson_complete: bool,
    pub completion_message: Option<&'static str>,

    /// Last exercise (in lesson order) completed before the presented one, or -1.
    pub last_completed_exercise_id: i64,

    pub total_exercises: usize,
    pub completed_exercises: usize,

    pub messages: Vec<FlashMessage>,
}
