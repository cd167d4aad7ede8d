use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::schemas::{ApiError, AppState, DataResponse, MessageResponse, MutationResponse, api_error};
use crate::store::PatientRecord;

/// List the demo patients.
#[utoipa::path(
    get,
    path = "/api/patients",
    tag = "directory",
    responses(
        (status = 200, description = "Demo patients", body = DataResponse<Vec<PatientRecord>>)
    )
)]
#[instrument(skip(state))]
pub async fn list_patients(State(state): State<AppState>) -> Json<DataResponse<Vec<PatientRecord>>> {
    Json(DataResponse::new(state.directory.list_patients().await))
}

/// Create a demo patient from whatever fields the client sent. The
/// creator is taken from the `user-id` header, defaulting to 1.
#[utoipa::path(
    post,
    path = "/api/patients",
    tag = "directory",
    responses(
        (status = 200, description = "Patient created", body = MutationResponse<PatientRecord>)
    )
)]
#[instrument(skip(state, headers, body))]
pub async fn create_patient(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<MutationResponse<PatientRecord>> {
    let mut fields = body.as_object().cloned().unwrap_or_default();

    let created_by = headers
        .get("user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(1);
    fields.insert("createdBy".to_string(), Value::from(created_by));

    let record = state.directory.create_patient(fields).await;
    info!(id = record.id, "Demo patient created");
    Json(MutationResponse::new("Paciente creado correctamente", record))
}

/// Merge fields into a demo patient.
#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    tag = "directory",
    params(
        ("id" = i64, Path, description = "Patient id"),
    ),
    responses(
        (status = 200, description = "Patient updated", body = MutationResponse<PatientRecord>),
        (status = 404, description = "Unknown patient", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn update_patient(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<MutationResponse<PatientRecord>>, ApiError> {
    let fields = body.as_object().cloned().unwrap_or_default();

    match state.directory.update_patient(id, fields).await {
        Some(record) => Ok(Json(MutationResponse::new(
            "Paciente actualizado correctamente",
            record,
        ))),
        None => {
            warn!(id, "Update matched no demo patient");
            Err(api_error(
                StatusCode::NOT_FOUND,
                "Paciente no encontrado",
                "PATIENT_NOT_FOUND",
            ))
        }
    }
}

/// Delete a demo patient.
#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    tag = "directory",
    params(
        ("id" = i64, Path, description = "Patient id"),
    ),
    responses(
        (status = 200, description = "Patient deleted", body = MessageResponse),
        (status = 404, description = "Unknown patient", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_patient(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.directory.delete_patient(id).await {
        info!(id, "Demo patient deleted");
        Ok(Json(MessageResponse::new("Paciente eliminado correctamente")))
    } else {
        Err(api_error(
            StatusCode::NOT_FOUND,
            "Paciente no encontrado",
            "PATIENT_NOT_FOUND",
        ))
    }
}
