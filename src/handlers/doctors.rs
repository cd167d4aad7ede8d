use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::schemas::{ApiError, AppState, DataResponse, MessageResponse, MutationResponse, api_error};
use crate::store::{DoctorPatch, DoctorRecord};

/// Doctor as listed by the admin screen; the stored password is not
/// echoed here.
#[derive(Debug, Serialize, ToSchema)]
pub struct DoctorSummary {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub specialty: String,
}

impl From<DoctorRecord> for DoctorSummary {
    fn from(record: DoctorRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            name: record.name,
            email: record.email,
            specialty: record.specialty,
        }
    }
}

/// List the demo doctors.
#[utoipa::path(
    get,
    path = "/api/doctors",
    tag = "directory",
    responses(
        (status = 200, description = "Demo doctors", body = DataResponse<Vec<DoctorSummary>>)
    )
)]
#[instrument(skip(state))]
pub async fn list_doctors(
    State(state): State<AppState>,
) -> Json<DataResponse<Vec<DoctorSummary>>> {
    let doctors = state.directory.list_doctors().await;
    Json(DataResponse::new(
        doctors.into_iter().map(DoctorSummary::from).collect(),
    ))
}

/// Create a demo doctor.
#[utoipa::path(
    post,
    path = "/api/doctors",
    tag = "directory",
    request_body = DoctorPatch,
    responses(
        (status = 200, description = "Doctor created", body = MutationResponse<DoctorRecord>)
    )
)]
#[instrument(skip(state, patch))]
pub async fn create_doctor(
    State(state): State<AppState>,
    Json(patch): Json<DoctorPatch>,
) -> Json<MutationResponse<DoctorRecord>> {
    let record = state.directory.create_doctor(patch).await;
    info!(id = record.id, "Demo doctor created");
    Json(MutationResponse::new("Doctor creado correctamente", record))
}

/// Partially update a demo doctor.
#[utoipa::path(
    put,
    path = "/api/doctors/{id}",
    tag = "directory",
    params(
        ("id" = i64, Path, description = "Doctor id"),
    ),
    request_body = DoctorPatch,
    responses(
        (status = 200, description = "Doctor updated", body = MutationResponse<DoctorRecord>),
        (status = 404, description = "Unknown doctor", body = ErrorResponse)
    )
)]
#[instrument(skip(state, patch))]
pub async fn update_doctor(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(patch): Json<DoctorPatch>,
) -> Result<Json<MutationResponse<DoctorRecord>>, ApiError> {
    match state.directory.update_doctor(id, patch).await {
        Some(record) => Ok(Json(MutationResponse::new(
            "Doctor actualizado correctamente",
            record,
        ))),
        None => {
            warn!(id, "Update matched no demo doctor");
            Err(api_error(
                StatusCode::NOT_FOUND,
                "Doctor no encontrado",
                "DOCTOR_NOT_FOUND",
            ))
        }
    }
}

/// Delete a demo doctor.
#[utoipa::path(
    delete,
    path = "/api/doctors/{id}",
    tag = "directory",
    params(
        ("id" = i64, Path, description = "Doctor id"),
    ),
    responses(
        (status = 200, description = "Doctor deleted", body = MessageResponse),
        (status = 404, description = "Unknown doctor", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_doctor(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.directory.delete_doctor(id).await {
        info!(id, "Demo doctor deleted");
        Ok(Json(MessageResponse::new("Doctor eliminado correctamente")))
    } else {
        Err(api_error(
            StatusCode::NOT_FOUND,
            "Doctor no encontrado",
            "DOCTOR_NOT_FOUND",
        ))
    }
}
