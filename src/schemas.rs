use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Json;
use predictor::PredictorClient;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::store::DirectoryStore;

pub use common::DataResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Client for the external risk predictor
    pub predictor: PredictorClient,
    /// Demo doctor/patient directory; injected so tests can substitute
    /// their own store
    pub directory: Arc<dyn DirectoryStore>,
}

/// Response for mutations that only report an outcome message.
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

/// Response for directory mutations that echo the affected record.
#[derive(Serialize, ToSchema)]
pub struct MutationResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> MutationResponse<T> {
    pub fn new(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Error reply carried by handlers.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Build an error reply with the standard `{success, error, code}` body.
pub fn api_error(status: StatusCode, message: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            code: code.to_string(),
            success: false,
        }),
    )
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Service banner returned at the root path.
#[derive(Serialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::health::service_info,
        crate::handlers::auth::register,
        crate::handlers::auth::login_doctor,
        crate::handlers::auth::login_apoderado,
        crate::handlers::prediction::submit_prediction,
        crate::handlers::forms::my_forms,
        crate::handlers::forms::recent_forms,
        crate::handlers::forms::form_detail,
        crate::handlers::forms::patient_history,
        crate::handlers::users::list_users,
        crate::handlers::users::create_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::doctors::list_doctors,
        crate::handlers::doctors::create_doctor,
        crate::handlers::doctors::update_doctor,
        crate::handlers::doctors::delete_doctor,
        crate::handlers::patients::list_patients,
        crate::handlers::patients::create_patient,
        crate::handlers::patients::update_patient,
        crate::handlers::patients::delete_patient,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            HealthResponse,
            ServiceInfo,
            common::IntakeSubmission,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::RegisterResponse,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::DoctorLoginResponse,
            crate::handlers::auth::ApoderadoLoginResponse,
            crate::handlers::prediction::PredictionResponse,
            crate::handlers::prediction::PredictorFailure,
            crate::handlers::forms::FormSummary,
            crate::handlers::forms::RecentForm,
            crate::handlers::forms::FormDetail,
            crate::handlers::forms::HistoryRow,
            crate::handlers::users::UserSummary,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::doctors::DoctorSummary,
            crate::store::DoctorRecord,
            crate::store::DoctorPatch,
            crate::store::PatientRecord,
            DataResponse<Vec<crate::handlers::forms::FormSummary>>,
            DataResponse<Vec<crate::handlers::forms::RecentForm>>,
            DataResponse<Option<crate::handlers::forms::FormDetail>>,
            DataResponse<Vec<crate::handlers::forms::HistoryRow>>,
            DataResponse<Vec<crate::handlers::users::UserSummary>>,
            DataResponse<Vec<crate::handlers::doctors::DoctorSummary>>,
            DataResponse<Vec<crate::store::PatientRecord>>,
            MutationResponse<crate::store::DoctorRecord>,
            MutationResponse<crate::store::PatientRecord>,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "prediction", description = "Intake submission and risk prediction"),
        (name = "forms", description = "Submitted intake forms"),
        (name = "users", description = "Guardian identity administration"),
        (name = "directory", description = "Demo doctor/patient directory"),
    ),
    info(
        title = "Centro Médico del ASMA API",
        description = "Medical records API with delegated asthma-risk prediction",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
