// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, exam, home, result, submission},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public: registration, login, dashboard totals.
/// * Bearer token required: exams, submissions, results.
///   Role checks happen inside the handlers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let exam_routes = Router::new()
        .route("/", get(exam::list_exams).post(exam::create_exam))
        .route("/{id}", delete(exam::delete_exam))
        .route("/{id}/take", get(exam::take_exam))
        .route("/{id}/preview", get(exam::preview_exam))
        .route("/{id}/submit", post(submission::submit_exam))
        .route("/{id}/statistics", get(result::exam_statistics))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let result_routes = Router::new()
        .route("/", get(result::list_my_results))
        .route("/{id}", get(result::get_result))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/api/stats", get(home::get_stats))
        .nest("/api/auth", auth_routes)
        .nest("/api/exams", exam_routes)
        .nest("/api/results", result_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
