// tests/common/mod.rs

#![allow(dead_code)]

use exam_grader::{config::Config, routes, state::AppState};
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

/// In-memory database with migrations applied. One connection keeps the database alive.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        teacher_email: None,
        teacher_password: None,
    }
}

/// Spawns the app on a random port.
pub async fn spawn_app() -> TestApp {
    let pool = test_pool().await;
    let state = AppState {
        pool: pool.clone(),
        config: test_config(),
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        pool,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, email: &str, password: &str, role: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "email": email, "password": password, "role": role }))
            .send()
            .await
            .expect("Register request failed")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Login request failed")
    }

    /// Registers a fresh account with `role` and returns its bearer token.
    pub async fn token_for(&self, role: &str) -> String {
        let email = format!("{}_{}@school.test", role, &uuid::Uuid::new_v4().to_string()[..8]);
        let password = "password123";

        let response = self.register(&email, password, role).await;
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = self.login(&email, password).await.json().await.unwrap();
        body["token"].as_str().expect("Token not found").to_string()
    }

    /// Creates an exam as the given teacher and returns its id.
    pub async fn create_exam(&self, teacher_token: &str, exam: Value) -> i64 {
        let response = self
            .client
            .post(self.url("/api/exams"))
            .bearer_auth(teacher_token)
            .json(&exam)
            .send()
            .await
            .expect("Create exam failed");
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.unwrap();
        body["id"].as_i64().expect("Exam id not found")
    }

    /// Question ids of an exam, in creation order, read via the teacher preview.
    pub async fn question_ids(&self, teacher_token: &str, exam_id: i64) -> Vec<i64> {
        let body: Value = self
            .client
            .get(self.url(&format!("/api/exams/{}/preview", exam_id)))
            .bearer_auth(teacher_token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        body["questions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["id"].as_i64().unwrap())
            .collect()
    }

    /// Submits `(question id, answer text)` pairs to an exam.
    pub async fn submit(
        &self,
        token: &str,
        exam_id: i64,
        answers: &[(i64, &str)],
    ) -> reqwest::Response {
        let answers: serde_json::Map<String, Value> = answers
            .iter()
            .map(|(id, text)| (id.to_string(), json!(text)))
            .collect();

        self.client
            .post(self.url(&format!("/api/exams/{}/submit", exam_id)))
            .bearer_auth(token)
            .json(&json!({ "answers": answers }))
            .send()
            .await
            .expect("Submit failed")
    }
}
