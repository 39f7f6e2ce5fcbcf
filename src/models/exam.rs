// src/models/exam.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::question::CreateQuestionRequest;

/// Represents the 'exams' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i64,

    /// Denominator for the submission percentage.
    pub max_points: i64,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Row for the exam listing, with the number of attached questions.
#[derive(Debug, Serialize, FromRow)]
pub struct ExamSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub max_points: i64,
    pub question_count: i64,
}

/// An exam together with its questions.
/// `Q` is `PublicQuestion` for students and `Question` for teachers.
#[derive(Debug, Serialize)]
pub struct ExamDetail<Q> {
    #[serde(flatten)]
    pub exam: Exam,
    pub questions: Vec<Q>,
}

/// DTO for creating an exam with its questions.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExamRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required."))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 1440))]
    pub duration_minutes: i64,
    /// Defaults to the sum of question points when omitted.
    /// Must not be below that sum, or a full score would exceed 100%.
    #[validate(range(min = 0))]
    pub max_points: Option<i64>,
    #[validate(length(max = 500), nested)]
    #[serde(default)]
    pub questions: Vec<CreateQuestionRequest>,
}

impl CreateExamRequest {
    pub fn question_points(&self) -> i64 {
        self.questions.iter().map(|q| q.points).sum()
    }

    pub fn resolved_max_points(&self) -> i64 {
        self.max_points.unwrap_or_else(|| self.question_points())
    }

    /// Rejects a `max_points` smaller than the points its questions award.
    pub fn check_max_points(&self) -> Result<(), String> {
        match self.max_points {
            Some(max) if max < self.question_points() => Err(format!(
                "max_points ({}) is below the total of question points ({})",
                max,
                self.question_points()
            )),
            _ => Ok(()),
        }
    }
}
