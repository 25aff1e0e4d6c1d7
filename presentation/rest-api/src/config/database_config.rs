use persistence::db::{DatabaseConfig, create_postgres_pool, run_migrations};
use sqlx::PgPool;
use std::env;
use std::time::Duration;

const DEFAULT_MIGRATIONS_PATH: &str = "infrastructure/persistence/migrations";

/// Reads the pool settings from environment variables
///
/// Environment variables:
/// - DATABASE_URL: PostgreSQL connection string (required)
/// - DATABASE_MAX_CONNECTIONS: pool size (default: 5)
/// - DATABASE_ACQUIRE_TIMEOUT_SECS: wait for a free connection (default: 30)
pub fn database_config_from_env() -> anyhow::Result<DatabaseConfig> {
    let db_url =
        env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let mut config = DatabaseConfig::new(db_url);

    if let Some(max_connections) = parse_var("DATABASE_MAX_CONNECTIONS")? {
        config.max_connections = max_connections;
    }
    if let Some(secs) = parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS")? {
        config.acquire_timeout = Duration::from_secs(secs);
    }

    Ok(config)
}

/// Connects and applies pending migrations from `MIGRATIONS_PATH`
/// (default: `infrastructure/persistence/migrations`).
pub async fn init_database() -> anyhow::Result<PgPool> {
    let config = database_config_from_env()?;
    let pool = create_postgres_pool(&config).await?;

    let migrations_path =
        env::var("MIGRATIONS_PATH").unwrap_or_else(|_| DEFAULT_MIGRATIONS_PATH.to_string());
    run_migrations(&pool, &migrations_path).await?;
    tracing::info!("Database ready (migrations from {migrations_path})");

    Ok(pool)
}

pub(super) fn parse_var<T: std::str::FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, raw: &str) -> anyhow::Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{name} has an invalid value {raw:?}"))
}
