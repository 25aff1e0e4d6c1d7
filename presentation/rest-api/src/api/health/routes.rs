use chrono::Utc;
use poem_openapi::{Object, OpenApi, payload::Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::api::tags::ApiTags;

#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct HealthCheckResponse {
    /// `healthy` when the database answers, `degraded` otherwise
    pub status: String,
    /// `up` or `down`
    pub database: String,
    /// Current server timestamp (RFC 3339)
    pub timestamp: String,
    pub version: String,
}

impl HealthCheckResponse {
    fn from_probe(database_up: bool) -> Self {
        let (status, database) = if database_up {
            ("healthy", "up")
        } else {
            ("degraded", "down")
        };
        Self {
            status: status.to_string(),
            database: database.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Liveness endpoint for load balancers and container probes.
pub struct HealthApi {
    pool: PgPool,
}

impl HealthApi {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[OpenApi]
impl HealthApi {
    /// Health check
    ///
    /// Always answers 200 while the process is up; `database` reports
    /// whether a connection could run a trivial query. No authentication.
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health_check(&self) -> Json<HealthCheckResponse> {
        let database_up = match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Health probe could not reach the database: {e}");
                false
            }
        };
        Json(HealthCheckResponse::from_probe(database_up))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_degraded_when_database_is_down() {
        let response = HealthCheckResponse::from_probe(false);

        assert_eq!(response.status, "degraded");
        assert_eq!(response.database, "down");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn should_report_healthy_when_database_answers() {
        let response = HealthCheckResponse::from_probe(true);

        assert_eq!(response.status, "healthy");
        assert_eq!(response.database, "up");
    }
}
