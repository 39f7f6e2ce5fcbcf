// src/grading.rs

//! Scoring of exam submissions.
//!
//! Everything here is pure: no I/O, no shared state. Handlers load the answer
//! keys and the submitted answers, call [`grade_submission`], and persist the
//! returned [`ScoringResult`].

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    config::{GRADE_THRESHOLDS, LOWEST_GRADE},
    models::question::AnswerKey,
};

/// Outcome of grading one submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringResult {
    pub score: i64,
    pub percentage: f64,
    pub grade: i64,
}

/// Sums the points of every correctly answered question.
///
/// Questions without an entry in `answers` earn nothing, and answers for ids
/// that are not in `questions` are ignored.
pub fn compute_score(questions: &[AnswerKey], answers: &HashMap<i64, String>) -> i64 {
    questions
        .iter()
        .filter(|q| {
            answers
                .get(&q.id)
                .is_some_and(|given| answers_match(given, &q.correct_answer))
        })
        .map(|q| q.points)
        .sum()
}

/// Score as a share of `max_points`, scaled to 0..=100.
///
/// Non-positive `max_points` yields 0.
pub fn compute_percentage(score: i64, max_points: i64) -> f64 {
    if max_points <= 0 {
        return 0.0;
    }
    score as f64 / max_points as f64 * 100.0
}

/// Maps a percentage to a grade between 1 and 5.
///
/// Total over every `f64`: anything below the lowest threshold (NaN included)
/// gets the lowest grade.
pub fn compute_grade(percentage: f64) -> i64 {
    GRADE_THRESHOLDS
        .iter()
        .find(|(bound, _)| percentage >= *bound)
        .map_or(LOWEST_GRADE, |(_, grade)| *grade)
}

/// Scores a submission and derives its percentage and grade.
pub fn grade_submission(
    questions: &[AnswerKey],
    answers: &HashMap<i64, String>,
    max_points: i64,
) -> ScoringResult {
    let score = compute_score(questions, answers);
    let percentage = compute_percentage(score, max_points);

    ScoringResult {
        score,
        percentage,
        grade: compute_grade(percentage),
    }
}

/// Case-insensitive comparison after trimming surrounding whitespace.
fn answers_match(given: &str, correct: &str) -> bool {
    given
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .eq(correct.trim().chars().flat_map(char::to_lowercase))
}
