use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use model::entities::registro::{self, UserType};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

use crate::guards::is_valid_dni;
use crate::schemas::{ApiError, AppState, DataResponse, MessageResponse, api_error};

/// Birth date recorded for identities created through the admin screen,
/// which does not ask for one.
const DEFAULT_BIRTHDAY: (i32, u32, u32) = (2000, 1, 1);

/// Guardian identity as listed by the admin screen.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub email: String,
    pub dni: i32,
}

impl From<registro::Model> for UserSummary {
    fn from(model: registro::Model) -> Self {
        Self {
            id: model.dni,
            username: model.usuario,
            name: model.nombres,
            email: model.correo,
            dni: model.dni,
        }
    }
}

/// Request body for creating a guardian identity from the admin screen.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub dni: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// List all guardian identities.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "Guardian identities", body = DataResponse<Vec<UserSummary>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<UserSummary>>>, ApiError> {
    let rows = registro::Entity::find()
        .filter(registro::Column::TipoUsuario.eq(UserType::Apoderado))
        .all(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to list guardian identities: {}", db_error);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error en el servidor",
                "DATABASE_ERROR",
            )
        })?;

    debug!("Listed {} guardian identities", rows.len());
    Ok(Json(DataResponse::new(
        rows.into_iter().map(UserSummary::from).collect(),
    )))
}

/// Create a guardian identity with a defaulted birth date.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Identity created", body = MessageResponse),
        (status = 400, description = "Invalid DNI", body = ErrorResponse),
        (status = 409, description = "DNI already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let dni = request.dni.unwrap_or_default();
    if !is_valid_dni(&dni) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "DNI debe tener 8 dígitos numéricos",
            "INVALID_DNI",
        ));
    }
    let dni_num: i32 = dni.parse().map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            "DNI debe tener 8 dígitos numéricos",
            "INVALID_DNI",
        )
    })?;

    let (year, month, day) = DEFAULT_BIRTHDAY;
    let birthday = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();

    let new_registro = registro::ActiveModel {
        dni: Set(dni_num),
        tipo_usuario: Set(UserType::Apoderado),
        nombres: Set(request.name.unwrap_or_default()),
        apellidos: Set(String::new()),
        usuario: Set(request.username.unwrap_or_default()),
        contrasena: Set(request.password.unwrap_or_default()),
        correo: Set(request.email.unwrap_or_default()),
        fecha_de_nacimiento: Set(birthday),
    };

    match new_registro.insert(&state.db).await {
        Ok(saved) => {
            info!(dni = saved.dni, "Guardian identity created");
            Ok(Json(MessageResponse::new("Usuario creado correctamente")))
        }
        Err(db_error) => {
            error!("Failed to create guardian identity: {}", db_error);
            let conflict = match &db_error {
                DbErr::Exec(exec_err) => {
                    let message = exec_err.to_string().to_lowercase();
                    message.contains("unique") || message.contains("constraint")
                }
                _ => false,
            };
            if conflict {
                Err(api_error(
                    StatusCode::CONFLICT,
                    "Ya existe un usuario con ese DNI",
                    "DNI_TAKEN",
                ))
            } else {
                Err(api_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error en el servidor",
                    "DATABASE_ERROR",
                ))
            }
        }
    }
}

/// Partially update a guardian identity by DNI. An unknown DNI is still
/// reported as success (UPDATE-zero-rows semantics).
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "8-digit DNI"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Identity updated", body = MessageResponse),
        (status = 400, description = "Invalid DNI", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !is_valid_dni(&id) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "DNI debe tener 8 dígitos numéricos",
            "INVALID_DNI",
        ));
    }
    let dni_num: i32 = id.parse().map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            "DNI debe tener 8 dígitos numéricos",
            "INVALID_DNI",
        )
    })?;

    let existing = registro::Entity::find_by_id(dni_num)
        .filter(registro::Column::TipoUsuario.eq(UserType::Apoderado))
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to look up guardian identity: {}", db_error);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error en el servidor",
                "DATABASE_ERROR",
            )
        })?;

    let Some(existing) = existing else {
        warn!(dni = dni_num, "Update matched no guardian identity");
        return Ok(Json(MessageResponse::new("Usuario actualizado correctamente")));
    };

    let mut active: registro::ActiveModel = existing.into();
    if let Some(username) = request.username {
        active.usuario = Set(username);
    }
    if let Some(password) = request.password {
        active.contrasena = Set(password);
    }
    if let Some(name) = request.name {
        active.nombres = Set(name);
    }
    if let Some(email) = request.email {
        active.correo = Set(email);
    }

    active.update(&state.db).await.map_err(|db_error| {
        error!("Failed to update guardian identity: {}", db_error);
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error en el servidor",
            "DATABASE_ERROR",
        )
    })?;

    info!(dni = dni_num, "Guardian identity updated");
    Ok(Json(MessageResponse::new("Usuario actualizado correctamente")))
}

/// Delete a guardian identity by DNI. Deleting an unknown DNI is a
/// no-op success.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "8-digit DNI"),
    ),
    responses(
        (status = 200, description = "Identity deleted", body = MessageResponse),
        (status = 400, description = "Invalid DNI", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !is_valid_dni(&id) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "DNI debe tener 8 dígitos numéricos",
            "INVALID_DNI",
        ));
    }
    let dni_num: i32 = id.parse().map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            "DNI debe tener 8 dígitos numéricos",
            "INVALID_DNI",
        )
    })?;

    let result = registro::Entity::delete_many()
        .filter(registro::Column::Dni.eq(dni_num))
        .filter(registro::Column::TipoUsuario.eq(UserType::Apoderado))
        .exec(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to delete guardian identity: {}", db_error);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error en el servidor",
                "DATABASE_ERROR",
            )
        })?;

    info!(dni = dni_num, rows = result.rows_affected, "Guardian identity delete finished");
    Ok(Json(MessageResponse::new("Usuario eliminado correctamente")))
}
