use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use predictor::{DEFAULT_TIMEOUT_SECS, PredictorClient};
use sea_orm::Database;

use crate::schemas::AppState;
use crate::store::InMemoryDirectory;

/// Initialize application state against a specific database URL. The
/// predictor endpoint and timeout come from the environment.
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    let predictor = PredictorClient::new(&ml_base_url(), Duration::from_secs(ml_timeout_secs()));
    let directory = Arc::new(InMemoryDirectory::with_demo_data());

    Ok(AppState {
        db,
        predictor,
        directory,
    })
}

/// Base URL of the external prediction microservice.
fn ml_base_url() -> String {
    std::env::var("ML_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

fn ml_timeout_secs() -> u64 {
    std::env::var("ML_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}
