use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use common::IntakeSubmission;
use model::entities::paciente_asma;
use predictor::FeaturePayload;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::guards::{self, is_valid_dni};
use crate::schemas::{AppState, api_error};

/// Successful prediction reply.
#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionResponse {
    pub success: bool,
    pub target: i32,
    pub probabilidad_riesgo: f64,
    pub interpretacion: String,
}

/// Failure reply when the delegated predictor call cannot complete. The
/// upstream status, detail and URL are echoed so the front can surface
/// them.
#[derive(Debug, Serialize, ToSchema)]
pub struct PredictorFailure {
    pub success: bool,
    pub message: String,
    pub ml_status: Option<u16>,
    pub ml_error: String,
    pub ml_url: String,
}

/// Submit an intake form and score it.
///
/// The flow is a straight line: validate, insert the draft row with null
/// result columns, call the external predictor (15 s timeout, no retry),
/// then update the same row with the returned values. A predictor
/// failure aborts the request and leaves the draft row behind with its
/// results null.
#[utoipa::path(
    post,
    path = "/prediccion",
    tag = "prediction",
    request_body = IntakeSubmission,
    params(
        ("x-dni" = String, Header, description = "8-digit DNI of the submitting guardian"),
    ),
    responses(
        (status = 200, description = "Form stored and scored", body = PredictionResponse),
        (status = 400, description = "Missing trust header or invalid submission", body = ErrorResponse),
        (status = 500, description = "Database failure or predictor failure", body = PredictorFailure)
    )
)]
#[instrument(skip(state, headers, submission))]
pub async fn submit_prediction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(submission): Json<IntakeSubmission>,
) -> Response {
    let creador_dni = match guards::require_dni(&headers) {
        Ok(dni) => dni,
        Err(reply) => return reply.into_response(),
    };

    let dni_paciente = submission.dni.trim().to_string();
    if !is_valid_dni(&dni_paciente) {
        return api_error(
            StatusCode::BAD_REQUEST,
            "DNI del paciente inválido",
            "INVALID_PATIENT_DNI",
        )
        .into_response();
    }
    let dni_num: i32 = match dni_paciente.parse() {
        Ok(dni) => dni,
        Err(_) => {
            return api_error(
                StatusCode::BAD_REQUEST,
                "DNI del paciente inválido",
                "INVALID_PATIENT_DNI",
            )
            .into_response();
        }
    };

    let paciente = submission.paciente.trim().to_string();
    let distrito = submission.distrito.trim().to_string();
    if paciente.is_empty() || submission.fecha_cita.trim().is_empty() || distrito.is_empty() {
        return api_error(
            StatusCode::BAD_REQUEST,
            "Faltan campos requeridos (paciente/fecha_cita/distrito)",
            "MISSING_FIELDS",
        )
        .into_response();
    }
    let Ok(fecha_cita) = NaiveDate::parse_from_str(submission.fecha_cita.trim(), "%Y-%m-%d") else {
        return api_error(
            StatusCode::BAD_REQUEST,
            "Fecha de cita inválida, formato YYYY-MM-DD",
            "INVALID_DATE",
        )
        .into_response();
    };

    let humedad = submission.resolved_humidity();
    let indice_alergico = submission.allergic_index();

    // Draft row, result columns null until the predictor answers.
    let draft = paciente_asma::ActiveModel {
        creado_por_dni: Set(creador_dni),
        dni: Set(dni_num),
        paciente: Set(paciente.clone()),
        genero: Set(submission.genero.map(|g| g.to_string()).unwrap_or_default()),
        annos: Set(submission.annos),
        fecha_cita: Set(fecha_cita),
        distrito: Set(distrito),
        distrito_cod: Set(submission.distrito_cod.clone()),
        humedad_pct: Set(humedad),
        historial_familiar_asma: Set(submission.historial_familiar_asma),
        familiares_asma: Set(submission.familiares_asma),
        antecedentes_resp: Set(submission.antecedentes_resp),
        tipo_enf_resp: Set(submission.tipo_enf_resp),
        presencia_mascotas: Set(submission.presencia_mascotas),
        cantidad_mascotas: Set(submission.cantidad_mascotas),
        tipo_mascotas: Set(submission.tipo_mascotas),
        exposicion_alergenos: Set(submission.exposicion_alergenos),
        frec_sibilancias: Set(submission.frec_sibilancias),
        rinitis_alergica: Set(submission.rinitis_alergica),
        frec_actividad_fisica: Set(submission.frec_actividad_fisica),
        indice_alergico: Set(indice_alergico),
        target: Set(None),
        probabilidad_riesgo: Set(None),
        interpretacion: Set(None),
        ..Default::default()
    };

    if let Err(db_error) = draft.insert(&state.db).await {
        error!("Failed to insert intake draft: {}", db_error);
        return api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error en el servidor",
            "DATABASE_ERROR",
        )
        .into_response();
    }
    info!(creador_dni, paciente = %paciente, "Intake draft stored, calling predictor");

    let payload = FeaturePayload::from_submission(&submission, humedad, indice_alergico);
    let prediction = match state.predictor.predict(&payload).await {
        Ok(prediction) => prediction,
        Err(err) => {
            // No retry and no cleanup: the draft row stays with null
            // results.
            error!("Predictor call failed: {}", err);
            let failure = PredictorFailure {
                success: false,
                message: "Error llamando al predictor".to_string(),
                ml_status: err.upstream_status(),
                ml_error: err.detail(),
                ml_url: state.predictor.endpoint(),
            };
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(failure)).into_response();
        }
    };

    let probabilidad = prediction.probability();
    let interpretacion = prediction.interpretation();
    let target = prediction.classification();

    // Locate the draft again by the field-tuple match key, not by row
    // id; at most one row is touched. Two identical concurrent
    // submissions can race here and score each other's row.
    let matched = paciente_asma::Entity::find()
        .filter(paciente_asma::Column::Dni.eq(dni_num))
        .filter(paciente_asma::Column::FechaCita.eq(fecha_cita))
        .filter(paciente_asma::Column::Paciente.eq(paciente.clone()))
        .filter(paciente_asma::Column::HumedadPct.eq(humedad))
        .filter(paciente_asma::Column::IndiceAlergico.eq(indice_alergico))
        .one(&state.db)
        .await;

    match matched {
        Ok(Some(row)) => {
            let mut scored: paciente_asma::ActiveModel = row.into();
            scored.target = Set(Some(target));
            scored.probabilidad_riesgo = Set(Some(probabilidad));
            scored.interpretacion = Set(Some(interpretacion.clone()));
            if let Err(db_error) = scored.update(&state.db).await {
                error!("Failed to store prediction results: {}", db_error);
                return api_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error en el servidor",
                    "DATABASE_ERROR",
                )
                .into_response();
            }
        }
        Ok(None) => {
            // The caller still gets the computed numbers.
            warn!("Prediction update found no matching draft row, results not persisted");
        }
        Err(db_error) => {
            error!("Failed to look up the draft row: {}", db_error);
            return api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error en el servidor",
                "DATABASE_ERROR",
            )
            .into_response();
        }
    }

    info!(
        target,
        probabilidad, "Prediction stored and returned to the caller"
    );
    Json(PredictionResponse {
        success: true,
        target,
        probabilidad_riesgo: probabilidad,
        interpretacion,
    })
    .into_response()
}
