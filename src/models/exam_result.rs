// src/models/exam_result.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'exam_results' table in the database.
/// Rows are written once per submission and never updated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub score: i64,
    pub percentage: f64,
    pub grade: i64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// A result joined with the title of its exam, for the student's history.
#[derive(Debug, Serialize, FromRow)]
pub struct ResultListEntry {
    pub id: i64,
    pub exam_id: i64,
    pub exam_title: String,
    pub score: i64,
    pub percentage: f64,
    pub grade: i64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting answers to an exam.
#[derive(Debug, Deserialize)]
pub struct SubmitExamRequest {
    /// Key: Question ID, Value: the student's answer text.
    #[serde(default)]
    pub answers: HashMap<i64, String>,
}

/// Aggregate figures over every submission of one exam.
#[derive(Debug, Serialize)]
pub struct ExamStatistics {
    pub exam_id: i64,
    pub submissions: i64,
    pub average_percentage: Option<f64>,
    pub highest_percentage: Option<f64>,
    pub lowest_percentage: Option<f64>,
    /// Submission count per grade; keys are grades 1 to 5.
    pub grade_distribution: std::collections::BTreeMap<i64, i64>,
}
