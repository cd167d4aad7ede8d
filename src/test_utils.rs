#[cfg(test)]
pub mod test_utils {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{Router, http::StatusCode, response::Json, routing::post};
    use migration::{Migrator, MigratorTrait};
    use predictor::PredictorClient;
    use sea_orm::{Database, DatabaseConnection};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    use crate::router::create_router;
    use crate::schemas::AppState;
    use crate::store::InMemoryDirectory;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Spawn a canned predictor on an ephemeral local port and return its
    /// base URL. Every `POST /prediccion` answers with the given status
    /// and body.
    pub async fn spawn_predictor_stub(status: StatusCode, body: serde_json::Value) -> String {
        let app = Router::new().route(
            "/prediccion",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Stub listener has no address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Stub predictor server failed");
        });

        format!("http://{}", addr)
    }

    /// Create AppState for testing, pointing the predictor at `ml_base_url`.
    pub async fn setup_test_app_state_with_predictor(ml_base_url: &str) -> AppState {
        let db = setup_test_db().await;

        AppState {
            db,
            predictor: PredictorClient::new(ml_base_url, Duration::from_secs(2)),
            directory: Arc::new(InMemoryDirectory::with_demo_data()),
        }
    }

    /// Create AppState for testing. The predictor points at a dead local
    /// port; tests that exercise the prediction flow spawn a stub and use
    /// `setup_test_app_state_with_predictor` instead.
    pub async fn setup_test_app_state() -> AppState {
        setup_test_app_state_with_predictor("http://127.0.0.1:9").await
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        create_router(state)
    }

    /// Spawn the full API on an ephemeral local port and return its base
    /// URL, for tests that drive it with the client crate over real HTTP.
    pub async fn spawn_api(state: AppState) -> String {
        let app = create_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind API listener");
        let addr = listener.local_addr().expect("API listener has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("API server failed");
        });
        format!("http://{}", addr)
    }
}
