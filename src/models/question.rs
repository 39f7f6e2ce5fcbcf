// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    pub exam_id: i64,

    /// The text shown to the student.
    pub text: String,

    /// Expected answer, compared ignoring case and surrounding whitespace.
    pub correct_answer: String,

    pub points: i64,
}

/// DTO for sending a question to a student (excludes the correct answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub text: String,
    pub points: i64,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            points: q.points,
        }
    }
}

/// The part of a question needed for grading.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerKey {
    pub id: i64,
    pub correct_answer: String,
    pub points: i64,
}

/// DTO for a question nested in an exam creation request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    #[validate(range(min = 0, max = 10000))]
    pub points: i64,
}
