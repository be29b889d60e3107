// src/handlers/exercise.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    config::POINTS_PER_CORRECT_ANSWER,
    error::{AppError, lesson_url},
    models::{
        exercise::{Exercise, SubmissionResponse, SubmitExerciseRequest},
        progress::{Progress, record_attempt},
        user::User,
    },
    utils::{jwt::Claims, streak},
};

pub const SELECT_AN_OPTION: &str = "Submission error. Please select an option.";
pub const CORRUPT_OPTIONS: &str = "Error processing exercise options during submission.";

/// Text shown to the user after a graded submission.
fn feedback_message(is_correct: bool, awarded: bool, correct_answer: &str) -> String {
    match (is_correct, awarded) {
        (true, true) => format!("Correct! You earned {} points!", POINTS_PER_CORRECT_ANSWER),
        (true, false) => "Correct!".to_string(),
        (false, _) => format!("Incorrect. The correct answer was: {}", correct_answer),
    }
}

/// Grades an answer and records it.
///
/// * Rejects unanswered submissions and answers outside the option list.
/// * Creates or updates the (user, exercise) progress row.
/// * Awards points when the exercise becomes correctly answered.
/// * Advances the user's daily streak on every graded submission.
///
/// Progress, points and streak are committed in one transaction.
pub async fn submit_exercise(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(exercise_id): Path<i64>,
    Json(payload): Json<SubmitExerciseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let exercise = sqlx::query_as::<_, Exercise>(
        r#"
        SELECT id, lesson_id, exercise_type, question, options, correct_answer, position
        FROM exercises
        WHERE id = ?
        "#,
    )
    .bind(exercise_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Exercise not found".to_string()))?;

    let lesson_id = sqlx::query_scalar::<_, i64>("SELECT id FROM lessons WHERE id = ?")
        .bind(exercise.lesson_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

    let options = exercise.parse_options().map_err(|e| {
        tracing::warn!(exercise_id, "Stored options do not parse: {}", e);
        AppError::SubmissionRejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: CORRUPT_OPTIONS.to_string(),
            lesson_id,
        }
    })?;

    let answer = payload
        .answer
        .filter(|a| options.iter().any(|o| o == a))
        .ok_or(AppError::SubmissionRejected {
            status: StatusCode::BAD_REQUEST,
            message: SELECT_AN_OPTION.to_string(),
            lesson_id,
        })?;

    // Write lock taken before the reads; concurrent submissions wait on busy_timeout.
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password, points, current_streak, last_activity_date, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::LoginRequired)?;

    let previous = sqlx::query_as::<_, Progress>(
        r#"
        SELECT id, user_id, lesson_id, exercise_id, completed, score, last_answer, last_attempt_at
        FROM user_progress
        WHERE user_id = ? AND exercise_id = ?
        "#,
    )
    .bind(user_id)
    .bind(exercise.id)
    .fetch_optional(&mut *tx)
    .await?;

    let attempt = record_attempt(previous.as_ref(), &answer, &exercise.correct_answer);
    let points_awarded = if attempt.award_points {
        POINTS_PER_CORRECT_ANSWER
    } else {
        0
    };
    let new_streak = user.streak().advance(streak::today());

    sqlx::query(
        r#"
        INSERT INTO user_progress (user_id, lesson_id, exercise_id, completed, score, last_answer, last_attempt_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id, exercise_id) DO UPDATE SET
            completed = excluded.completed,
            score = excluded.score,
            last_answer = excluded.last_answer,
            last_attempt_at = excluded.last_attempt_at
        "#,
    )
    .bind(user_id)
    .bind(lesson_id)
    .bind(exercise.id)
    .bind(attempt.completed)
    .bind(attempt.score)
    .bind(&attempt.last_answer)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    let total_points = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE users
        SET points = points + ?, current_streak = ?, last_activity_date = ?
        WHERE id = ?
        RETURNING points
        "#,
    )
    .bind(points_awarded)
    .bind(new_streak.current_streak)
    .bind(new_streak.last_activity_date)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        user_id,
        exercise_id,
        correct = attempt.is_correct,
        points_awarded,
        streak = new_streak.current_streak,
        "Exercise submitted"
    );

    Ok(Json(SubmissionResponse {
        correct: attempt.is_correct,
        awarded_new_points: attempt.award_points,
        points_awarded,
        message: feedback_message(
            attempt.is_correct,
            attempt.award_points,
            &exercise.correct_answer,
        ),
        category: if attempt.is_correct { "success" } else { "danger" },
        correct_answer: exercise.correct_answer,
        total_points,
        current_streak: new_streak.current_streak,
        lesson_id,
        redirect_to: lesson_url(lesson_id),
    }))
}
