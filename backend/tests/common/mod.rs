// tests/common/mod.rs

#![allow(dead_code)]

use learnpath::{config::Config, routes, state::AppState};
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
    _db_dir: Option<TempDir>,
}

/// Spawns the app on a random port, backed by a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    serve(pool, None).await
}

/// Spawns the app on a file database with a multi-connection pool, the way
/// the binary runs it.
pub async fn spawn_app_on_file() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("app.db"))
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Failed to open SQLite file");

    serve(pool, Some(dir)).await
}

async fn serve(pool: SqlitePool, db_dir: Option<TempDir>) -> TestApp {
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        seed_sample_data: false,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        pool,
        client: reqwest::Client::new(),
        _db_dir: db_dir,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Registers a fresh user and returns (user id, bearer token).
    pub async fn register_user(&self) -> (i64, String) {
        let username = format!("u_{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
        let resp: serde_json::Value = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "password123"
            }))
            .send()
            .await
            .expect("Register failed")
            .json()
            .await
            .expect("Failed to parse register json");

        let id = resp["user"]["id"].as_i64().expect("User id not found");
        let token = resp["token"].as_str().expect("Token not found").to_string();
        (id, token)
    }

    /// Creates a course with one lesson and returns the lesson id.
    pub async fn create_lesson(&self) -> i64 {
        let course_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO courses (title, description) VALUES ('Arithmetic', 'Numbers') RETURNING id",
        )
        .fetch_one(&self.pool)
        .await
        .unwrap();

        sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO lessons (title, content, course_id, "order") VALUES ('Addition', '<p>Add</p>', ?, 1) RETURNING id"#,
        )
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .unwrap()
    }

    /// Adds an exercise with the given raw options JSON and returns its id.
    pub async fn create_exercise(
        &self,
        lesson_id: i64,
        question: &str,
        options: &str,
        correct_answer: &str,
    ) -> i64 {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO exercises (lesson_id, exercise_type, question, options, correct_answer, position)
            VALUES (?, 'multiple_choice', ?, ?, ?, (SELECT COUNT(*) FROM exercises WHERE lesson_id = ?))
            RETURNING id
            "#,
        )
        .bind(lesson_id)
        .bind(question)
        .bind(options)
        .bind(correct_answer)
        .bind(lesson_id)
        .fetch_one(&self.pool)
        .await
        .unwrap()
    }

    pub async fn submit(&self, token: &str, exercise_id: i64, answer: &str) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/api/exercises/{}/submit", exercise_id)))
            .bearer_auth(token)
            .json(&serde_json::json!({ "answer": answer }))
            .send()
            .await
            .expect("Submit failed")
    }

    pub async fn get_json(&self, token: &str, path: &str) -> serde_json::Value {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Request failed")
            .json()
            .await
            .expect("Failed to parse json")
    }

    /// (points, current_streak, last_activity_date) straight from the users table.
    pub async fn user_row(&self, user_id: i64) -> (i64, i64, Option<chrono::NaiveDate>) {
        sqlx::query_as::<_, (i64, i64, Option<chrono::NaiveDate>)>(
            "SELECT points, current_streak, last_activity_date FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .unwrap()
    }

    pub async fn set_activity(&self, user_id: i64, streak: i64, last: chrono::NaiveDate) {
        sqlx::query("UPDATE users SET current_streak = ?, last_activity_date = ? WHERE id = ?")
            .bind(streak)
            .bind(last)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .unwrap();
    }
}
