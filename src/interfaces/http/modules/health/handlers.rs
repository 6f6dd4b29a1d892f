//! Health check handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use utoipa::ToSchema;

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    /// `None` when running on in-memory storage
    pub db: Option<DatabaseConnection>,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
}

/// Component health status
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/ping",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn ping() -> &'static str {
    "pong"
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded", body = HealthResponse)
    )
)]
pub async fn health_check(
    State(state): State<HealthState>,
) -> (StatusCode, Json<HealthResponse>) {
    let uptime = state.started_at.elapsed().as_secs();

    let db_health = match &state.db {
        Some(db) => {
            let db_start = Instant::now();
            match db
                .execute(Statement::from_string(
                    db.get_database_backend(),
                    "SELECT 1".to_string(),
                ))
                .await
            {
                Ok(_) => ComponentHealth {
                    status: "ok".to_string(),
                    latency_ms: Some(db_start.elapsed().as_millis() as u64),
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Database ping failed");
                    ComponentHealth {
                        status: "error".to_string(),
                        latency_ms: None,
                    }
                }
            }
        }
        None => ComponentHealth {
            status: "memory".to_string(),
            latency_ms: None,
        },
    };

    let healthy = db_health.status != "error";
    let http_status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime,
            database: db_health,
        }),
    )
}
