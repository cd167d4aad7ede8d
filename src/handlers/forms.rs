use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::NaiveDate;
use model::entities::paciente_asma;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::guards::{self, is_valid_dni};
use crate::schemas::{ApiError, AppState, DataResponse, api_error};

/// Hard cap on the recent-forms page size.
const MAX_RECENT_LIMIT: u64 = 50;
const DEFAULT_RECENT_LIMIT: u64 = 5;

/// One row of a guardian's own form list.
#[derive(Debug, Serialize, ToSchema)]
pub struct FormSummary {
    pub dni: i32,
    pub paciente: String,
    pub fecha_cita: NaiveDate,
    pub annos: Option<i32>,
}

impl From<paciente_asma::Model> for FormSummary {
    fn from(model: paciente_asma::Model) -> Self {
        Self {
            dni: model.dni,
            paciente: model.paciente,
            fecha_cita: model.fecha_cita,
            annos: model.annos,
        }
    }
}

/// One row of the doctor-facing recent list, including the prediction
/// result columns (null until scored).
#[derive(Debug, Serialize, ToSchema)]
pub struct RecentForm {
    pub paciente: String,
    pub dni: i32,
    pub fecha_cita: NaiveDate,
    pub annos: Option<i32>,
    pub genero: String,
    pub distrito: String,
    pub target: Option<i32>,
    pub probabilidad_riesgo: Option<f64>,
    pub interpretacion: Option<String>,
}

impl From<paciente_asma::Model> for RecentForm {
    fn from(model: paciente_asma::Model) -> Self {
        Self {
            paciente: model.paciente,
            dni: model.dni,
            fecha_cita: model.fecha_cita,
            annos: model.annos,
            genero: model.genero,
            distrito: model.distrito,
            target: model.target,
            probabilidad_riesgo: model.probabilidad_riesgo,
            interpretacion: model.interpretacion,
        }
    }
}

/// One row of a patient's visit history.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryRow {
    pub dni: i32,
    pub paciente: String,
    pub fecha_cita: NaiveDate,
    pub annos: Option<i32>,
    pub target: Option<i32>,
    pub probabilidad_riesgo: Option<f64>,
    pub interpretacion: Option<String>,
}

impl From<paciente_asma::Model> for HistoryRow {
    fn from(model: paciente_asma::Model) -> Self {
        Self {
            dni: model.dni,
            paciente: model.paciente,
            fecha_cita: model.fecha_cita,
            annos: model.annos,
            target: model.target,
            probabilidad_riesgo: model.probabilidad_riesgo,
            interpretacion: model.interpretacion,
        }
    }
}

/// Full form detail. Feature columns keep the wire names the front
/// renders, several of which contain spaces.
#[derive(Debug, Serialize, ToSchema)]
pub struct FormDetail {
    pub id: i32,
    pub creado_por_dni: i32,
    pub dni: i32,
    pub paciente: String,
    pub genero: String,
    pub annos: Option<i32>,
    pub fecha_cita: NaiveDate,
    pub distrito: String,
    pub distrito_cod: Option<String>,
    #[serde(rename = "humedad (%)")]
    pub humedad: f64,
    #[serde(rename = "historial familiar de asma")]
    pub historial_familiar_asma: Option<i32>,
    #[serde(rename = "familiares con asma")]
    pub familiares_asma: Option<i32>,
    #[serde(rename = "antecedentes de enfermedades respiratorias")]
    pub antecedentes_resp: Option<i32>,
    #[serde(rename = "tipo de enfermedades respiratorias")]
    pub tipo_enf_resp: Option<i32>,
    #[serde(rename = "presencia de mascotas en el hogar")]
    pub presencia_mascotas: Option<i32>,
    #[serde(rename = "cantidad de mascotas")]
    pub cantidad_mascotas: Option<i32>,
    #[serde(rename = "tipo de mascotas")]
    pub tipo_mascotas: Option<i32>,
    #[serde(rename = "exposicion a alergenos")]
    pub exposicion_alergenos: Option<i32>,
    #[serde(rename = "frecuencia de episodios de sibilancias")]
    pub frec_sibilancias: Option<i32>,
    #[serde(rename = "presencia de rinitis alergica u otras alergias")]
    pub rinitis_alergica: Option<i32>,
    #[serde(rename = "frecuencia de actividad fisica")]
    pub frec_actividad_fisica: Option<i32>,
    pub indice_alergico: i32,
    pub target: Option<i32>,
    pub probabilidad_riesgo: Option<f64>,
    pub interpretacion: Option<String>,
}

impl From<paciente_asma::Model> for FormDetail {
    fn from(model: paciente_asma::Model) -> Self {
        Self {
            id: model.id,
            creado_por_dni: model.creado_por_dni,
            dni: model.dni,
            paciente: model.paciente,
            genero: model.genero,
            annos: model.annos,
            fecha_cita: model.fecha_cita,
            distrito: model.distrito,
            distrito_cod: model.distrito_cod,
            humedad: model.humedad_pct,
            historial_familiar_asma: model.historial_familiar_asma,
            familiares_asma: model.familiares_asma,
            antecedentes_resp: model.antecedentes_resp,
            tipo_enf_resp: model.tipo_enf_resp,
            presencia_mascotas: model.presencia_mascotas,
            cantidad_mascotas: model.cantidad_mascotas,
            tipo_mascotas: model.tipo_mascotas,
            exposicion_alergenos: model.exposicion_alergenos,
            frec_sibilancias: model.frec_sibilancias,
            rinitis_alergica: model.rinitis_alergica,
            frec_actividad_fisica: model.frec_actividad_fisica,
            indice_alergico: model.indice_alergico,
            target: model.target,
            probabilidad_riesgo: model.probabilidad_riesgo,
            interpretacion: model.interpretacion,
        }
    }
}

/// Pagination for the recent list. Values arrive as raw strings and are
/// parsed leniently: garbage falls back to the defaults.
#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DetailQuery {
    pub dni: Option<String>,
    pub fecha: Option<String>,
    pub paciente: Option<String>,
}

/// List the forms submitted by the calling guardian, newest visit first.
#[utoipa::path(
    get,
    path = "/api/forms/mine",
    tag = "forms",
    params(
        ("x-dni" = String, Header, description = "8-digit DNI of the calling guardian"),
    ),
    responses(
        (status = 200, description = "Forms for the caller", body = DataResponse<Vec<FormSummary>>),
        (status = 400, description = "Missing trust header", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn my_forms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DataResponse<Vec<FormSummary>>>, ApiError> {
    let creador_dni = guards::require_dni(&headers)?;
    debug!(creador_dni, "Listing forms for guardian");

    let rows = paciente_asma::Entity::find()
        .filter(paciente_asma::Column::CreadoPorDni.eq(creador_dni))
        .order_by_desc(paciente_asma::Column::FechaCita)
        .all(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to list guardian forms: {}", db_error);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Error al listar", "DATABASE_ERROR")
        })?;

    Ok(Json(DataResponse::new(
        rows.into_iter().map(FormSummary::from).collect(),
    )))
}

/// List recent forms across all patients, doctor-only, paginated.
#[utoipa::path(
    get,
    path = "/api/forms/recent",
    tag = "forms",
    params(
        RecentQuery,
        ("x-role" = String, Header, description = "Must be `doctor`"),
    ),
    responses(
        (status = 200, description = "Recent forms", body = DataResponse<Vec<RecentForm>>),
        (status = 403, description = "Caller is not a doctor", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn recent_forms(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecentQuery>,
) -> Result<Json<DataResponse<Vec<RecentForm>>>, ApiError> {
    guards::require_doctor(&headers)?;

    // Clamp: limit defaults to 5 and never exceeds 50, offset never goes
    // negative.
    let limit = query
        .limit
        .as_deref()
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .map(|v| (v as u64).min(MAX_RECENT_LIMIT))
        .unwrap_or(DEFAULT_RECENT_LIMIT);
    let offset = query
        .offset
        .as_deref()
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .map(|v| v as u64)
        .unwrap_or(0);

    debug!(limit, offset, "Listing recent forms");

    let rows = paciente_asma::Entity::find()
        .order_by_desc(paciente_asma::Column::FechaCita)
        .order_by_desc(paciente_asma::Column::Dni)
        .limit(limit)
        .offset(offset)
        .all(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to list recent forms: {}", db_error);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error al listar recientes",
                "DATABASE_ERROR",
            )
        })?;

    Ok(Json(DataResponse::new(
        rows.into_iter().map(RecentForm::from).collect(),
    )))
}

/// Full detail for one (DNI, visit date, patient name) triple, doctor-only.
#[utoipa::path(
    get,
    path = "/api/forms/detail",
    tag = "forms",
    params(
        DetailQuery,
        ("x-role" = String, Header, description = "Must be `doctor`"),
    ),
    responses(
        (status = 200, description = "Matching form, or null", body = DataResponse<Option<FormDetail>>),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 403, description = "Caller is not a doctor", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn form_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DetailQuery>,
) -> Result<Json<DataResponse<Option<FormDetail>>>, ApiError> {
    guards::require_doctor(&headers)?;

    let dni = query.dni.as_deref().unwrap_or("");
    let fecha = query.fecha.as_deref().unwrap_or("");
    let paciente = query.paciente.as_deref().unwrap_or("");
    if !is_valid_dni(dni) || fecha.is_empty() || paciente.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Parámetros inválidos",
            "INVALID_PARAMETERS",
        ));
    }
    let dni_num: i32 = dni.parse().map_err(|_| {
        api_error(StatusCode::BAD_REQUEST, "Parámetros inválidos", "INVALID_PARAMETERS")
    })?;
    let fecha = NaiveDate::parse_from_str(fecha, "%Y-%m-%d").map_err(|_| {
        api_error(StatusCode::BAD_REQUEST, "Parámetros inválidos", "INVALID_PARAMETERS")
    })?;

    let row = paciente_asma::Entity::find()
        .filter(paciente_asma::Column::Dni.eq(dni_num))
        .filter(paciente_asma::Column::FechaCita.eq(fecha))
        .filter(paciente_asma::Column::Paciente.eq(paciente))
        .order_by_desc(paciente_asma::Column::FechaCita)
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to fetch form detail: {}", db_error);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error al obtener detalle",
                "DATABASE_ERROR",
            )
        })?;

    Ok(Json(DataResponse::new(row.map(FormDetail::from))))
}

/// All historical forms for one patient DNI, doctor-only, newest first.
#[utoipa::path(
    get,
    path = "/api/forms/{dni}",
    tag = "forms",
    params(
        ("dni" = String, Path, description = "8-digit patient DNI"),
        ("x-role" = String, Header, description = "Must be `doctor`"),
    ),
    responses(
        (status = 200, description = "Patient history", body = DataResponse<Vec<HistoryRow>>),
        (status = 400, description = "Invalid DNI", body = ErrorResponse),
        (status = 403, description = "Caller is not a doctor", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn patient_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(dni): Path<String>,
) -> Result<Json<DataResponse<Vec<HistoryRow>>>, ApiError> {
    guards::require_doctor(&headers)?;

    if !is_valid_dni(&dni) {
        return Err(api_error(StatusCode::BAD_REQUEST, "DNI inválido", "INVALID_DNI"));
    }
    let dni_num: i32 = dni
        .parse()
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "DNI inválido", "INVALID_DNI"))?;

    let rows = paciente_asma::Entity::find()
        .filter(paciente_asma::Column::Dni.eq(dni_num))
        .order_by_desc(paciente_asma::Column::FechaCita)
        .all(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to fetch patient history: {}", db_error);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Error al listar", "DATABASE_ERROR")
        })?;

    Ok(Json(DataResponse::new(
        rows.into_iter().map(HistoryRow::from).collect(),
    )))
}
