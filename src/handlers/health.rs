use axum::{extract::State, http::StatusCode, response::Json};
use tracing::instrument;

use crate::schemas::{AppState, HealthResponse, ServiceInfo};

/// Liveness probe, including a database ping.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 500, description = "Service is unhealthy", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let database = if state.db.ping().await.is_ok() {
        "connected"
    } else {
        "disconnected"
    };

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}

/// Service banner listing the main endpoints
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service banner", body = ServiceInfo)
    )
)]
#[instrument]
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "API del Centro Médico del ASMA funcionando correctamente".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: vec![
            "POST /api/auth/login/doctor".to_string(),
            "POST /api/auth/login/apoderado".to_string(),
            "POST /api/auth/register".to_string(),
            "POST /prediccion".to_string(),
            "GET  /api/forms/mine".to_string(),
            "GET  /api/forms/:dni (doctor)".to_string(),
        ],
    })
}
