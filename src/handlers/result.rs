// src/handlers/result.rs

use std::collections::BTreeMap;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    config::{GRADE_THRESHOLDS, LOWEST_GRADE},
    error::AppError,
    handlers::exam::fetch_exam,
    models::{
        exam_result::{ExamResult, ExamStatistics, ResultListEntry},
        user::Role,
    },
    utils::jwt::Claims,
};

#[derive(sqlx::FromRow)]
struct PercentageSummary {
    submissions: i64,
    average_percentage: Option<f64>,
    highest_percentage: Option<f64>,
    lowest_percentage: Option<f64>,
}

/// Lists the caller's own results, newest first.
pub async fn list_my_results(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id()?;

    let results = sqlx::query_as::<_, ResultListEntry>(
        r#"
        SELECT
            r.id,
            r.exam_id,
            e.title AS exam_title,
            r.score,
            r.percentage,
            r.grade,
            r.submitted_at
        FROM exam_results r
        JOIN exams e ON e.id = r.exam_id
        WHERE r.student_id = ?
        ORDER BY r.id DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list results for {}: {:?}", student_id, e);
        AppError::from(e)
    })?;

    Ok(Json(results))
}

/// Returns a single result. Visible to the student who owns it and to teachers.
pub async fn get_result(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query_as::<_, ExamResult>(
        r#"
        SELECT id, exam_id, student_id, score, percentage, grade, submitted_at
        FROM exam_results
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Result not found".to_string()))?;

    if claims.role != Role::Teacher && result.student_id != claims.user_id()? {
        return Err(AppError::Forbidden(
            "Result belongs to another student".to_string(),
        ));
    }

    Ok(Json(result))
}

/// Aggregates every submission of an exam.
/// Teacher only.
pub async fn exam_statistics(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    claims.require_role(Role::Teacher)?;
    fetch_exam(&pool, exam_id).await?;

    let summary = sqlx::query_as::<_, PercentageSummary>(
        r#"
        SELECT
            COUNT(*) AS submissions,
            AVG(percentage) AS average_percentage,
            MAX(percentage) AS highest_percentage,
            MIN(percentage) AS lowest_percentage
        FROM exam_results
        WHERE exam_id = ?
        "#,
    )
    .bind(exam_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to summarise exam {}: {:?}", exam_id, e);
        AppError::from(e)
    })?;

    let counts: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT grade, COUNT(*) FROM exam_results WHERE exam_id = ? GROUP BY grade",
    )
    .bind(exam_id)
    .fetch_all(&pool)
    .await?;

    // Every grade appears, even with no submissions.
    let mut grade_distribution: BTreeMap<i64, i64> = GRADE_THRESHOLDS
        .iter()
        .map(|(_, grade)| (*grade, 0))
        .chain(std::iter::once((LOWEST_GRADE, 0)))
        .collect();
    for (grade, count) in counts {
        grade_distribution.insert(grade, count);
    }

    Ok(Json(ExamStatistics {
        exam_id,
        submissions: summary.submissions,
        average_percentage: summary.average_percentage,
        highest_percentage: summary.highest_percentage,
        lowest_percentage: summary.lowest_percentage,
        grade_distribution,
    }))
}
