// src/handlers/submission.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    grading::grade_submission,
    handlers::exam::fetch_exam,
    models::{
        exam_result::{ExamResult, SubmitExamRequest},
        question::AnswerKey,
    },
    utils::jwt::Claims,
};

/// Grades a submission and stores the result.
///
/// * Answers for questions outside this exam are ignored.
/// * The percentage is taken against the exam's `max_points`.
/// * Each call stores a new, immutable `exam_results` row.
pub async fn submit_exam(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<i64>,
    Json(req): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id()?;
    let exam = fetch_exam(&pool, exam_id).await?;

    let answer_keys = sqlx::query_as::<_, AnswerKey>(
        "SELECT id, correct_answer, points FROM questions WHERE exam_id = ?",
    )
    .bind(exam_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch answer keys for exam {}: {:?}", exam_id, e);
        AppError::from(e)
    })?;

    let scoring = grade_submission(&answer_keys, &req.answers, exam.max_points);

    let submitted_at = chrono::Utc::now();
    let id = sqlx::query(
        r#"
        INSERT INTO exam_results (exam_id, student_id, score, percentage, grade, submitted_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(exam_id)
    .bind(student_id)
    .bind(scoring.score)
    .bind(scoring.percentage)
    .bind(scoring.grade)
    .bind(submitted_at)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to store result for exam {}: {:?}", exam_id, e);
        AppError::from(e)
    })?
    .last_insert_rowid();

    tracing::info!(
        "Exam {} submitted by {}: score {}, {:.2}%, grade {}",
        exam_id,
        student_id,
        scoring.score,
        scoring.percentage,
        scoring.grade
    );

    let result = ExamResult {
        id,
        exam_id,
        student_id,
        score: scoring.score,
        percentage: scoring.percentage,
        grade: scoring.grade,
        submitted_at,
    };

    Ok((StatusCode::CREATED, Json(result)))
}
