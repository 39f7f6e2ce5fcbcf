// src/config.rs

use std::{env, fmt};

use dotenvy::dotenv;

/// Grade thresholds, highest first. A percentage at or above the bound earns the grade.
pub const GRADE_THRESHOLDS: [(f64, i64); 4] = [(90.0, 5), (75.0, 4), (60.0, 3), (50.0, 2)];

/// Grade assigned when no threshold is reached.
pub const LOWEST_GRADE: i64 = 1;

const DEFAULT_DATABASE_URL: &str = "sqlite://exam_grader.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_JWT_EXPIRATION: u64 = 3600;

/// Errors raised while reading configuration at startup.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has invalid value '{}'", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: String,
    /// Optional teacher account created at startup.
    pub teacher_email: Option<String>,
    pub teacher_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration = match env::var("JWT_EXPIRATION") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: "JWT_EXPIRATION",
                value: raw,
            })?,
            Err(_) => DEFAULT_JWT_EXPIRATION,
        };

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            teacher_email: env::var("TEACHER_EMAIL").ok(),
            teacher_password: env::var("TEACHER_PASSWORD").ok(),
        })
    }
}
