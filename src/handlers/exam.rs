// src/handlers/exam.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        exam::{CreateExamRequest, Exam, ExamDetail, ExamSummary},
        question::{PublicQuestion, Question},
        user::Role,
    },
    utils::{html::clean_html, jwt::Claims},
};

/// Loads one exam or fails with 404.
pub async fn fetch_exam(pool: &SqlitePool, id: i64) -> Result<Exam, AppError> {
    sqlx::query_as::<_, Exam>(
        r#"
        SELECT id, title, description, duration_minutes, max_points, created_at
        FROM exams
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch exam {}: {:?}", id, e);
        AppError::from(e)
    })?
    .ok_or_else(|| AppError::NotFound("Exam not found".to_string()))
}

async fn fetch_questions(pool: &SqlitePool, exam_id: i64) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, exam_id, text, correct_answer, points
        FROM questions
        WHERE exam_id = ?
        ORDER BY id
        "#,
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch questions for exam {}: {:?}", exam_id, e);
        AppError::from(e)
    })?;

    Ok(questions)
}

/// Lists all exams, newest first.
pub async fn list_exams(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let exams = sqlx::query_as::<_, ExamSummary>(
        r#"
        SELECT
            e.id,
            e.title,
            e.description,
            e.duration_minutes,
            e.max_points,
            COUNT(q.id) AS question_count
        FROM exams e
        LEFT JOIN questions q ON q.exam_id = e.id
        GROUP BY e.id
        ORDER BY e.id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list exams: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(exams))
}

/// Creates an exam and its questions in one transaction.
/// Teacher only.
pub async fn create_exam(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    claims.require_role(Role::Teacher)?;
    payload.validate()?;
    payload.check_max_points().map_err(AppError::BadRequest)?;

    let max_points = payload.resolved_max_points();

    let mut tx = pool.begin().await?;

    let exam_id = sqlx::query(
        r#"
        INSERT INTO exams (title, description, duration_minutes, max_points, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(clean_html(&payload.title))
    .bind(payload.description.as_deref().map(clean_html))
    .bind(payload.duration_minutes)
    .bind(max_points)
    .bind(chrono::Utc::now())
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create exam: {:?}", e);
        AppError::from(e)
    })?
    .last_insert_rowid();

    for question in &payload.questions {
        // Answers are compared verbatim, so only the prompt is sanitised.
        sqlx::query(
            "INSERT INTO questions (exam_id, text, correct_answer, points) VALUES (?, ?, ?, ?)",
        )
        .bind(exam_id)
        .bind(clean_html(&question.text))
        .bind(&question.correct_answer)
        .bind(question.points)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create question for exam {}: {:?}", exam_id, e);
            AppError::from(e)
        })?;
    }

    tx.commit().await?;

    tracing::info!(
        "Exam {} created with {} questions ({} max points)",
        exam_id,
        payload.questions.len(),
        max_points
    );

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": exam_id }))))
}

/// Returns an exam for a student to answer, without correct answers.
/// Teachers are redirected to the preview.
pub async fn take_exam(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let exam = fetch_exam(&pool, id).await?;

    if claims.role == Role::Teacher {
        return Ok(Redirect::to(&format!("/api/exams/{}/preview", id)).into_response());
    }

    let questions: Vec<PublicQuestion> = fetch_questions(&pool, id)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    Ok(Json(ExamDetail { exam, questions }).into_response())
}

/// Returns an exam with its correct answers.
/// Students are redirected to the take view.
pub async fn preview_exam(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let exam = fetch_exam(&pool, id).await?;

    if claims.role == Role::Student {
        return Ok(Redirect::to(&format!("/api/exams/{}/take", id)).into_response());
    }

    let questions = fetch_questions(&pool, id).await?;

    Ok(Json(ExamDetail { exam, questions }).into_response())
}

/// Deletes an exam together with its questions and results.
/// Teacher only.
pub async fn delete_exam(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    claims.require_role(Role::Teacher)?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM exam_results WHERE exam_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM questions WHERE exam_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM exams WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete exam {}: {:?}", id, e);
            AppError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Exam not found".to_string()));
    }

    tx.commit().await?;

    tracing::info!("Exam {} deleted", id);

    Ok(StatusCode::NO_CONTENT)
}
