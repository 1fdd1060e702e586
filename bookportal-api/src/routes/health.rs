/// Liveness and health check endpoints
///
/// # Endpoints
///
/// ```text
/// GET /         -> {"message": "API is working"}
/// GET /health   -> {"status": "healthy", "version": "0.1.0", "database": "connected"}
/// ```
///
/// `/` has no dependencies. `/health` reports `degraded` when the database
/// does not answer a `SELECT 1`.

use crate::{app::AppState, error::ApiResult, routes::MessageResponse};
use axum::{extract::State, Json};
use bookportal_shared::db::pool;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("API is working"))
}

/// Health check handler
///
/// Returns service health status including database connectivity.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database_status = match pool::health_check(&state.db).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            "disconnected"
        }
    };

    Ok(Json(HealthResponse {
        status: if database_status == "connected" {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database_status.to_string(),
    }))
}
