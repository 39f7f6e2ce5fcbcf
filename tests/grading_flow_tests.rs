// tests/grading_flow_tests.rs

mod common;

use common::{TestApp, spawn_app};
use serde_json::{Value, json};

/// Creates an exam with `(correct answer, points)` questions and returns its id and question ids.
async fn seed_exam(
    app: &TestApp,
    teacher: &str,
    max_points: i64,
    questions: &[(&str, i64)],
) -> (i64, Vec<i64>) {
    let questions: Vec<Value> = questions
        .iter()
        .enumerate()
        .map(|(i, (answer, points))| {
            json!({ "text": format!("Question {}", i + 1), "correct_answer": answer, "points": points })
        })
        .collect();

    let exam_id = app
        .create_exam(
            teacher,
            json!({
                "title": "Graded Exam",
                "duration_minutes": 60,
                "max_points": max_points,
                "questions": questions
            }),
        )
        .await;
    let ids = app.question_ids(teacher, exam_id).await;
    (exam_id, ids)
}

async fn submit_json(
    app: &TestApp,
    token: &str,
    exam_id: i64,
    answers: &[(i64, &str)],
) -> Value {
    let response = app.submit(token, exam_id, answers).await;
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.unwrap()
}

#[tokio::test]
async fn all_correct_answers_earn_top_grade() {
    let app = spawn_app().await;
    let teacher = app.token_for("teacher").await;
    let student = app.token_for("student").await;
    let (exam_id, q) = seed_exam(&app, &teacher, 10, &[("4", 5), ("6", 5)]).await;

    let result = submit_json(&app, &student, exam_id, &[(q[0], "4"), (q[1], "6")]).await;

    assert_eq!(result["score"], 10);
    assert_eq!(result["percentage"], 100.0);
    assert_eq!(result["grade"], 5);
    assert_eq!(result["exam_id"], exam_id);
}

#[tokio::test]
async fn partially_correct_answers() {
    let app = spawn_app().await;
    let teacher = app.token_for("teacher").await;
    let student = app.token_for("student").await;
    let (exam_id, q) = seed_exam(&app, &teacher, 20, &[("H2O", 10), ("Au", 10)]).await;

    let result = submit_json(&app, &student, exam_id, &[(q[0], "H2O"), (q[1], "Ag")]).await;

    assert_eq!(result["score"], 10);
    assert_eq!(result["percentage"], 50.0);
    assert_eq!(result["grade"], 2);
}

#[tokio::test]
async fn all_wrong_answers_score_zero() {
    let app = spawn_app().await;
    let teacher = app.token_for("teacher").await;
    let student = app.token_for("student").await;
    let (exam_id, q) = seed_exam(&app, &teacher, 15, &[("is", 5), ("went", 10)]).await;

    let result = submit_json(&app, &student, exam_id, &[(q[0], "are"), (q[1], "goed")]).await;

    assert_eq!(result["score"], 0);
    assert_eq!(result["percentage"], 0.0);
    assert_eq!(result["grade"], 1);
}

#[tokio::test]
async fn percentage_uses_exam_max_points() {
    let app = spawn_app().await;
    let teacher = app.token_for("teacher").await;
    let student = app.token_for("student").await;
    let (exam_id, q) = seed_exam(
        &app,
        &teacher,
        40,
        &[("A1", 10), ("A2", 10), ("A3", 10), ("A4", 10)],
    )
    .await;

    let result = submit_json(
        &app,
        &student,
        exam_id,
        &[(q[0], "A1"), (q[1], "Wrong"), (q[2], "A3"), (q[3], "Wrong")],
    )
    .await;

    assert_eq!(result["score"], 20);
    assert_eq!(result["percentage"], 50.0);
    assert_eq!(result["grade"], 2);
}

#[tokio::test]
async fn answers_ignore_case_whitespace_and_unknown_ids() {
    let app = spawn_app().await;
    let teacher = app.token_for("teacher").await;
    let student = app.token_for("student").await;
    let (exam_id, q) = seed_exam(&app, &teacher, 3, &[("Paris", 3)]).await;

    let result = submit_json(
        &app,
        &student,
        exam_id,
        &[(q[0], "  PARIS  "), (q[0] + 1000, "Paris")],
    )
    .await;

    assert_eq!(result["score"], 3);
    assert_eq!(result["grade"], 5);
}

#[tokio::test]
async fn empty_submission_scores_zero() {
    let app = spawn_app().await;
    let teacher = app.token_for("teacher").await;
    let student = app.token_for("student").await;
    let (exam_id, _) = seed_exam(&app, &teacher, 2, &[("4", 2)]).await;

    let result = submit_json(&app, &student, exam_id, &[]).await;

    assert_eq!(result["score"], 0);
    assert_eq!(result["grade"], 1);
}

#[tokio::test]
async fn zero_max_points_yields_zero_percentage() {
    let app = spawn_app().await;
    let teacher = app.token_for("teacher").await;
    let student = app.token_for("student").await;
    let exam_id = app
        .create_exam(
            &teacher,
            json!({ "title": "Empty Exam", "duration_minutes": 10 }),
        )
        .await;

    let result = submit_json(&app, &student, exam_id, &[]).await;

    assert_eq!(result["score"], 0);
    assert_eq!(result["percentage"], 0.0);
    assert_eq!(result["grade"], 1);
}

#[tokio::test]
async fn submitting_to_missing_exam_is_404() {
    let app = spawn_app().await;
    let student = app.token_for("student").await;

    let response = app.submit(&student, 999, &[]).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn submitting_without_token_is_401() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/exams/1/submit"))
        .json(&json!({ "answers": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn results_are_persisted_and_scoped_to_their_student() {
    let app = spawn_app().await;
    let teacher = app.token_for("teacher").await;
    let alice = app.token_for("student").await;
    let bob = app.token_for("student").await;
    let (exam_id, q) = seed_exam(&app, &teacher, 100, &[("Answer", 100)]).await;

    let first = submit_json(&app, &alice, exam_id, &[(q[0], "Answer")]).await;
    let second = submit_json(&app, &alice, exam_id, &[(q[0], "nope")]).await;
    assert_ne!(first["id"], second["id"]);

    let mine: Vec<Value> = app
        .client
        .get(app.url("/api/results"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0]["id"], second["id"]);
    assert_eq!(mine[0]["exam_title"], "Graded Exam");
    assert_eq!(mine[1]["grade"], 5);

    let result_url = app.url(&format!("/api/results/{}", first["id"]));

    let own = app.client.get(&result_url).bearer_auth(&alice).send().await.unwrap();
    assert_eq!(own.status().as_u16(), 200);
    let own: Value = own.json().await.unwrap();
    assert_eq!(own["score"], 100);

    let other = app.client.get(&result_url).bearer_auth(&bob).send().await.unwrap();
    assert_eq!(other.status().as_u16(), 403);

    let by_teacher = app.client.get(&result_url).bearer_auth(&teacher).send().await.unwrap();
    assert_eq!(by_teacher.status().as_u16(), 200);

    let missing = app
        .client
        .get(app.url("/api/results/999"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    let bobs: Vec<Value> = app
        .client
        .get(app.url("/api/results"))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(bobs.is_empty());
}

#[tokio::test]
async fn exam_statistics_for_teachers() {
    let app = spawn_app().await;
    let teacher = app.token_for("teacher").await;
    let student = app.token_for("student").await;
    let (exam_id, q) = seed_exam(&app, &teacher, 20, &[("H2O", 10), ("Au", 10)]).await;

    submit_json(&app, &student, exam_id, &[(q[0], "H2O"), (q[1], "Au")]).await;
    submit_json(&app, &student, exam_id, &[(q[0], "H2O"), (q[1], "Ag")]).await;
    submit_json(&app, &student, exam_id, &[]).await;

    let url = app.url(&format!("/api/exams/{}/statistics", exam_id));

    let forbidden = app.client.get(&url).bearer_auth(&student).send().await.unwrap();
    assert_eq!(forbidden.status().as_u16(), 403);

    let stats: Value = app
        .client
        .get(&url)
        .bearer_auth(&teacher)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats["submissions"], 3);
    assert_eq!(stats["average_percentage"], 50.0);
    assert_eq!(stats["highest_percentage"], 100.0);
    assert_eq!(stats["lowest_percentage"], 0.0);
    assert_eq!(
        stats["grade_distribution"],
        json!({ "1": 1, "2": 1, "3": 0, "4": 0, "5": 1 })
    );
}

#[tokio::test]
async fn statistics_without_submissions() {
    let app = spawn_app().await;
    let teacher = app.token_for("teacher").await;
    let (exam_id, _) = seed_exam(&app, &teacher, 5, &[("x", 5)]).await;

    let stats: Value = app
        .client
        .get(app.url(&format!("/api/exams/{}/statistics", exam_id)))
        .bearer_auth(&teacher)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats["submissions"], 0);
    assert!(stats["average_percentage"].is_null());

    let missing = app
        .client
        .get(app.url("/api/exams/999/statistics"))
        .bearer_auth(&teacher)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn dashboard_counts() {
    let app = spawn_app().await;
    let teacher = app.token_for("teacher").await;
    let student = app.token_for("student").await;
    let (exam_id, q) = seed_exam(&app, &teacher, 1, &[("a", 1)]).await;
    submit_json(&app, &student, exam_id, &[(q[0], "a")]).await;

    let stats: Value = app
        .client
        .get(app.url("/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats["total_exams"], 1);
    assert_eq!(stats["total_results"], 1);
    assert_eq!(stats["total_users"], 2);
}
