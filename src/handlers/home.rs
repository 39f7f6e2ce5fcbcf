// src/handlers/home.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::AppError;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DashboardStats {
    pub total_exams: i64,
    pub total_results: i64,
    pub total_users: i64,
}

/// Totals shown on the landing page.
pub async fn get_stats(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let stats = sqlx::query_as::<_, DashboardStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM exams) AS total_exams,
            (SELECT COUNT(*) FROM exam_results) AS total_results,
            (SELECT COUNT(*) FROM users) AS total_users
        "#,
    )
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch dashboard stats: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(stats))
}
