// src/handlers/course.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        course::{Course, CourseDetail},
        lesson::LessonSummary,
    },
};

/// Lists all courses.
pub async fn list_courses(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let courses =
        sqlx::query_as::<_, Course>("SELECT id, title, description FROM courses ORDER BY id")
            .fetch_all(&pool)
            .await?;

    Ok(Json(courses))
}

/// Retrieves a course and its lessons in display order.
pub async fn get_course(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let course =
        sqlx::query_as::<_, Course>("SELECT id, title, description FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("Course not found".to_string()))?;

    let lessons = sqlx::query_as::<_, LessonSummary>(
        r#"
        SELECT id, title, "order"
        FROM lessons
        WHERE course_id = ?
        ORDER BY "order", id
        "#,
    )
    .bind(course.id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(CourseDetail { course, lessons }))
}
