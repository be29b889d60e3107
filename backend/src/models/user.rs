// src/models/user.rs

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::streak::StreakState;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid username pattern"));

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Unique email, used to log in.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// Gamification balance. Never decreases.
    pub points: i64,

    /// Consecutive days with at least one submitted exercise.
    pub current_streak: i64,

    pub last_activity_date: Option<NaiveDate>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    pub fn streak(&self) -> StreakState {
        StreakState {
            current_streak: self.current_streak,
            last_activity_date: self.last_activity_date,
        }
    }
}

/// Dashboard view of the current user.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub welcome: String,
    pub id: i64,
    pub username: String,
    pub email: String,
    pub points: i64,
    pub current_streak: i64,
    pub last_activity_date: Option<NaiveDate>,
    pub completed_exercises: i64,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Username length must be between 3 and 50 characters."
        ),
        regex(
            path = *USERNAME_RE,
            message = "Username may only contain letters, digits and underscores."
        )
    )]
    pub username: String,
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 120))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_registration_accepts_well_formed_input() {
        assert!(request("new_user", "new@example.com", "password123").validate().is_ok());
    }

    #[test]
    fn test_registration_rejects_bad_fields() {
        assert!(request("yo", "new@example.com", "password123").validate().is_err());
        assert!(request("bad name!", "new@example.com", "password123").validate().is_err());
        assert!(request("new_user", "not-an-email", "password123").validate().is_err());
        assert!(request("new_user", "new@example.com", "abc").validate().is_err());
    }
}
