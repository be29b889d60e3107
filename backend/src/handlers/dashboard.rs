// src/handlers/dashboard.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::user::{DashboardResponse, User},
    utils::jwt::Claims,
};

/// Current user's points, streak and overall progress.
pub async fn get_dashboard(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password, points, current_streak, last_activity_date, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    let completed_exercises = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM user_progress WHERE user_id = ? AND completed = TRUE",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(DashboardResponse {
        welcome: format!("Welcome, {}!", user.username),
        id: user.id,
        username: user.username,
        email: user.email,
        points: user.points,
        current_streak: user.current_streak,
        last_activity_date: user.last_activity_date,
        completed_exercises,
    }))
}
