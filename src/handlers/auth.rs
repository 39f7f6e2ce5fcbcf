// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, Role, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Inserts a user row and returns it. Shared by registration and startup seeding.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User, AppError> {
    let hashed_password = hash_password(password)?;

    let id = sqlx::query(
        "INSERT INTO users (email, password, role, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(email)
    .bind(&hashed_password)
    .bind(role.as_str())
    .bind(chrono::Utc::now())
    .execute(pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            AppError::Conflict(format!("Email '{}' is already registered", email))
        } else {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::from(e)
        }
    })?
    .last_insert_rowid();

    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password, role, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Registers a new student or teacher.
///
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();
    let user = create_user(&pool, &email, &payload.password, payload.role).await?;

    tracing::info!("Registered {} account {}", user.role, user.id);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT carrying the user's id and role.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password, role, created_at FROM users WHERE email = ?",
    )
    .bind(payload.email.trim().to_lowercase())
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::from(e)
    })?
    .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid email or password".to_string()));
    }

    let role = Role::parse(&user.role).ok_or_else(|| {
        AppError::InternalServerError(format!("User {} has unknown role '{}'", user.id, user.role))
    })?;

    let token = sign_jwt(user.id, role, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "role": role,
    })))
}
