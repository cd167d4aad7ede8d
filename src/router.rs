use crate::handlers::{
    auth::{login_apoderado, login_doctor, register},
    doctors::{create_doctor, delete_doctor, list_doctors, update_doctor},
    forms::{form_detail, my_forms, patient_history, recent_forms},
    health::{health_check, service_info},
    patients::{create_patient, delete_patient, list_patients, update_patient},
    prediction::submit_prediction,
    users::{create_user, delete_user, list_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Service banner and health check
        .route("/", get(service_info))
        .route("/health", get(health_check))
        // Auth
        .route("/api/auth/register", post(register))
        .route("/api/auth/login/doctor", post(login_doctor))
        .route("/api/auth/login/apoderado", post(login_apoderado))
        // Intake + prediction
        .route("/prediccion", post(submit_prediction))
        // Form reads
        .route("/api/forms/mine", get(my_forms))
        .route("/api/forms/recent", get(recent_forms))
        .route("/api/forms/detail", get(form_detail))
        .route("/api/forms/:dni", get(patient_history))
        // Guardian identity administration
        .route("/api/users", get(list_users))
        .route("/api/users", post(create_user))
        .route("/api/users/:id", put(update_user))
        .route("/api/users/:id", delete(delete_user))
        // Demo doctor directory
        .route("/api/doctors", get(list_doctors))
        .route("/api/doctors", post(create_doctor))
        .route("/api/doctors/:id", put(update_doctor))
        .route("/api/doctors/:id", delete(delete_doctor))
        // Demo patient directory
        .route("/api/patients", get(list_patients))
        .route("/api/patients", post(create_patient))
        .route("/api/patients/:id", put(update_patient))
        .route("/api/patients/:id", delete(delete_patient))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
