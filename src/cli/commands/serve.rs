use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::initialize_app_state_with_url;
use crate::router::create_router;

/// Bring up the API: connect the state, build the router, serve until
/// the process is stopped.
pub async fn serve(database_url: &str, bind_address: &str) -> Result<()> {
    info!("Centro Médico del ASMA API starting up");

    let state = initialize_app_state_with_url(database_url)
        .await
        .context("failed to initialize application state")?;
    let app = create_router(state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!("API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    axum::serve(listener, app)
        .await
        .context("server terminated with an error")?;

    info!("Server shutdown gracefully");
    Ok(())
}
