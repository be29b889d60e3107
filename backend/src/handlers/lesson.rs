// src/handlers/lesson.rs

use std::collections::HashSet;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        exercise::{Exercise, PublicExercise},
        lesson::{FlashMessage, LESSON_COMPLETE_MESSAGE, Lesson, LessonView},
        progress::Progress,
    },
    utils::{html::clean_lesson_html, jwt::Claims},
};

/// Outcome of scanning a lesson's exercises for one user.
#[derive(Debug)]
pub(crate) struct Selection<'a> {
    pub next: Option<&'a Exercise>,
    pub last_completed_exercise_id: i64,
    pub lesson_complete: bool,
}

/// Picks the first exercise (in lesson order) the user has not completed.
///
/// `exercises` must already be sorted. A lesson with no exercises has no next
/// exercise and is not complete.
pub(crate) fn select_next_exercise<'a>(
    exercises: &'a [Exercise],
    completed: &HashSet<i64>,
) -> Selection<'a> {
    let mut last_completed_exercise_id = -1;
    let mut next = None;

    for exercise in exercises {
        if !completed.contains(&exercise.id) {
            next = Some(exercise);
            break;
        }
        last_completed_exercise_id = exercise.id;
    }

    Selection {
        next,
        last_completed_exercise_id,
        lesson_complete: next.is_none() && !exercises.is_empty(),
    }
}

/// Lesson page for the current user: the lesson body plus the next exercise
/// to answer, or a completion notice.
pub async fn get_lesson(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let mut lesson = sqlx::query_as::<_, Lesson>(
        r#"SELECT id, title, content, course_id, "order" FROM lessons WHERE id = ?"#,
    )
    .bind(lesson_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

    let exercises = sqlx::query_as::<_, Exercise>(
        r#"
        SELECT id, lesson_id, exercise_type, question, options, correct_answer, position
        FROM exercises
        WHERE lesson_id = ?
        ORDER BY position, id
        "#,
    )
    .bind(lesson.id)
    .fetch_all(&pool)
    .await?;

    let completed: HashSet<i64> = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT exercise_id
        FROM user_progress
        WHERE user_id = ? AND lesson_id = ? AND completed = TRUE
        "#,
    )
    .bind(user_id)
    .bind(lesson.id)
    .fetch_all(&pool)
    .await?
    .into_iter()
    .collect();

    let selection = select_next_exercise(&exercises, &completed);
    let mut messages = Vec::new();
    let mut progress = None;
    let mut exercise = None;

    if let Some(next) = selection.next {
        progress = sqlx::query_as::<_, Progress>(
            r#"
            SELECT id, user_id, lesson_id, exercise_id, completed, score, last_answer, last_attempt_at
            FROM user_progress
            WHERE user_id = ? AND exercise_id = ?
            "#,
        )
        .bind(user_id)
        .bind(next.id)
        .fetch_optional(&pool)
        .await?;

        let options = next.parse_options().unwrap_or_else(|e| {
            tracing::warn!(exercise_id = next.id, "Stored options do not parse: {}", e);
            messages.push(FlashMessage::danger("Error loading exercise options."));
            Vec::new()
        });

        exercise = Some(PublicExercise::new(next, options));
    }

    lesson.content = lesson.content.as_deref().map(clean_lesson_html);

    Ok(Json(LessonView {
        lesson,
        exercise,
        progress,
        lesson_complete: selection.lesson_complete,
        completion_message: selection.lesson_complete.then_some(LESSON_COMPLETE_MESSAGE),
        last_completed_exercise_id: selection.last_completed_exercise_id,
        total_exercises: exercises.len(),
        completed_exercises: exercises
            .iter()
            .filter(|e| completed.contains(&e.id))
            .count(),
        messages,
    }))
}
