/// Welcome and health check endpoints
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "pool": { "activeConnections": 1, "idleConnections": 4, "totalConnections": 5 }
/// }
/// ```
///
/// `database` is `"in-memory"` when the server runs without PostgreSQL.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use quill_shared::db::pool::{get_pool_stats, health_check as db_health_check, PoolStats};
use serde::Serialize;

use crate::app::AppState;

pub const WELCOME: &str = "Welcome to the Quill blog API";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: &'static str,

    /// Application version
    pub version: &'static str,

    /// `connected`, `disconnected` or `in-memory`
    pub database: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,

    pub timestamp: DateTime<Utc>,
}

pub async fn welcome() -> &'static str {
    WELCOME
}

/// Always 200; a failed database check reports `degraded`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (database, pool) = match &state.db {
        Some(pool) => match db_health_check(pool).await {
            Ok(()) => ("connected", Some(get_pool_stats(pool))),
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                ("disconnected", Some(get_pool_stats(pool)))
            }
        },
        None => ("in-memory", None),
    };

    Json(HealthResponse {
        status: if database == "disconnected" { "degraded" } else { "healthy" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        pool,
        timestamp: Utc::now(),
    })
}
