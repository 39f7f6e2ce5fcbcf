// src/main.rs

use std::time::Duration;

use dotenvy::dotenv;
use exam_grader::config::Config;
use exam_grader::handlers::auth::create_user;
use exam_grader::models::user::Role;
use exam_grader::routes;
use exam_grader::state::AppState;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    tracing::error!("Failed to connect to database after 5 retries: {}", e);
                    return Err(e.into());
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied successfully.");

    if let Err(e) = seed_teacher(&pool, &config).await {
        tracing::error!("Failed to seed teacher account: {:?}", e);
    }

    let state = AppState {
        pool,
        config: config.clone(),
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn seed_teacher(pool: &SqlitePool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(email), Some(password)) = (&config.teacher_email, &config.teacher_password) {
        let email = email.trim().to_lowercase();
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(pool)
            .await?;

        if existing.is_none() {
            tracing::info!("Seeding teacher account: {}", email);
            create_user(pool, &email, password, Role::Teacher).await?;
            tracing::info!("Teacher account created successfully.");
        }
    }
    Ok(())
}
