// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::{Claims, sign_jwt},
    },
};

pub const USERNAME_TAKEN: &str = "That username is taken. Please choose a different one.";
pub const EMAIL_TAKEN: &str = "That email is taken. Please choose a different one.";
pub const LOGIN_FAILED: &str = "Login Unsuccessful. Please check email and password";

const USER_COLUMNS: &str =
    "id, username, email, password, points, current_streak, last_activity_date, created_at";

/// Registers a new user and logs them in.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with the user object (excluding password) and a token.
/// A taken username and a taken email produce different 409 messages.
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let username_taken =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(&payload.username)
            .fetch_one(&pool)
            .await?;
    if username_taken > 0 {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let email_taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(&payload.email)
        .fetch_one(&pool)
        .await?;
    if email_taken > 0 {
        return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, email, password) VALUES (?, ?, ?) RETURNING {USER_COLUMNS}"
    ))
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&hashed_password)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        // Lost a race with a concurrent registration.
        let msg = e.to_string();
        if msg.contains("users.username") {
            AppError::Conflict(USERNAME_TAKEN.to_string())
        } else if msg.contains("users.email") {
            AppError::Conflict(EMAIL_TAKEN.to_string())
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    let token = sign_jwt(
        user.id,
        &user.username,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    tracing::info!(user_id = user.id, "Registered user {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user": user,
            "token": token,
            "type": "Bearer",
            "message": "Your account has been created! You are now able to log in"
        })),
    ))
}

/// Authenticates a user by email and returns a JWT token.
///
/// Unknown email and wrong password fail with the same message.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.validate().is_err() {
        return Err(AppError::AuthError(LOGIN_FAILED.to_string()));
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
    ))
    .bind(&payload.email)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .ok_or(AppError::AuthError(LOGIN_FAILED.to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError(LOGIN_FAILED.to_string()));
    }

    let token = sign_jwt(
        user.id,
        &user.username,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "message": "Login successful!"
    })))
}

/// Revokes the token used for this request.
///
/// Revocations whose token has already expired are deleted first.
pub async fn logout(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let pruned = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < ?")
        .bind(Utc::now().timestamp())
        .execute(&pool)
        .await?
        .rows_affected();
    if pruned > 0 {
        tracing::debug!("Pruned {} expired token revocations", pruned);
    }

    sqlx::query("INSERT OR IGNORE INTO revoked_tokens (jti, expires_at) VALUES (?, ?)")
        .bind(&claims.jti)
        .bind(claims.exp as i64)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "You have been logged out." })))
}
