// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError, models::user::Role};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    pub role: Role,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    /// Numeric user id carried in `sub`.
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))
    }

    /// Fails with 403 unless the caller has `role`.
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role != role {
            return Err(AppError::Forbidden(format!(
                "Only a {} may do this",
                role.as_str()
            )));
        }
        Ok(())
    }
}

/// Signs a new JWT for the user.
pub fn sign_jwt(
    id: i64,
    role: Role,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: id.to_string(),
        role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Validates the 'Authorization: Bearer <token>' header and injects `Claims`
/// into the request extensions. Responds 401 otherwise.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

    let claims = verify_jwt(token, &config.jwt_secret)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
