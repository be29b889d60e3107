// src/models/course.rs

use serde::Serialize;
use sqlx::FromRow;

use crate::models::lesson::LessonSummary;

/// Represents the 'courses' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

/// A course together with its lessons, sorted by their `order`.
#[derive(Debug, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<LessonSummary>,
}
