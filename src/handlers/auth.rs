use axum::{extract::State, http::StatusCode, response::Json};
use chrono::NaiveDate;
use model::entities::registro::{self, UserType};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::guards::is_valid_dni;
use crate::schemas::{ApiError, AppState, api_error};

/// Characters the password heuristic looks for; five or more occurrences
/// in total reject the password. Parameterized queries are the actual
/// injection protection; existing clients expect this check and its
/// status code.
const SUSPICIOUS_PATTERNS: &[&str] = &["'", "\"", "--", ";", "=", "%", "*", "(", ")", "\\", "#"];
const SUSPICIOUS_THRESHOLD: usize = 5;

fn contains_sql_chars(text: &str) -> bool {
    SUSPICIOUS_PATTERNS
        .iter()
        .map(|pattern| text.matches(pattern).count())
        .sum::<usize>()
        >= SUSPICIOUS_THRESHOLD
}

/// Request body for registering an identity. Field names follow the
/// wire contract the front sends (a mix of English and Spanish).
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub apellido: Option<String>,
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    pub tipo_usuario: Option<String>,
    /// Birth date, `YYYY-MM-DD`.
    #[serde(default)]
    pub birthday: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub nombres: String,
    pub apellidos: String,
}

/// Login credentials, `contraseña` on the wire.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub usuario: Option<String>,
    #[serde(default, rename = "contraseña")]
    pub contrasena: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DoctorLoginResponse {
    pub success: bool,
    /// Display name; the front shows the doctor's surname here.
    pub usuario: String,
    pub dni: i32,
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApoderadoLoginResponse {
    pub success: bool,
    pub nombres: String,
    pub apellidos: String,
    pub dni: i32,
    pub role: String,
}

/// Register a new identity (doctor or guardian).
///
/// The status codes distinguish every rejection cause (400/401/405/406/
/// 409/403), which existing clients depend on. That scheme leaks which
/// check failed; see DESIGN.md.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Identity registered", body = RegisterResponse),
        (status = 400, description = "Missing fields or unknown user type", body = ErrorResponse),
        (status = 401, description = "Password rejected by the blacklist heuristic", body = ErrorResponse),
        (status = 403, description = "DNI already registered", body = ErrorResponse),
        (status = 405, description = "Malformed DNI", body = ErrorResponse),
        (status = 406, description = "Malformed birth date", body = ErrorResponse),
        (status = 409, description = "Username already taken for this role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    fn present(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.is_empty())
    }

    let (
        Some(username),
        Some(password),
        Some(email),
        Some(nombre),
        Some(apellido),
        Some(dni),
        Some(tipo_tag),
        Some(birthday),
    ) = (
        present(&request.username),
        present(&request.password),
        present(&request.email),
        present(&request.nombre),
        present(&request.apellido),
        present(&request.dni),
        present(&request.tipo_usuario),
        present(&request.birthday),
    )
    else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Faltan campos obligatorios",
            "MISSING_FIELDS",
        ));
    };

    if contains_sql_chars(password) {
        warn!("Registration rejected by the password heuristic");
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "Contraseña no válida",
            "INVALID_PASSWORD",
        ));
    }

    if !is_valid_dni(dni) {
        return Err(api_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "DNI debe tener 8 dígitos numéricos",
            "INVALID_DNI",
        ));
    }
    let dni_num: i32 = dni.parse().map_err(|_| {
        api_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "DNI debe tener 8 dígitos numéricos",
            "INVALID_DNI",
        )
    })?;

    let parsed_birthday = if birthday.len() == 10 {
        NaiveDate::parse_from_str(birthday, "%Y-%m-%d").ok()
    } else {
        None
    };
    let Some(birthday) = parsed_birthday else {
        return Err(api_error(
            StatusCode::NOT_ACCEPTABLE,
            "Fecha inválida, formato YYYY-MM-DD",
            "INVALID_BIRTHDAY",
        ));
    };

    let Some(tipo) = UserType::from_tag(tipo_tag) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Tipo de usuario inválido",
            "INVALID_USER_TYPE",
        ));
    };

    // A username may exist once per role.
    match registro::Entity::find()
        .filter(registro::Column::Usuario.eq(username))
        .filter(registro::Column::TipoUsuario.eq(tipo))
        .one(&state.db)
        .await
    {
        Ok(Some(_)) => {
            return Err(api_error(
                StatusCode::CONFLICT,
                "Usuario ya existe, cree otro",
                "USERNAME_TAKEN",
            ));
        }
        Ok(None) => {}
        Err(db_error) => {
            error!("Failed to check username uniqueness: {}", db_error);
            return Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error en el servidor",
                "DATABASE_ERROR",
            ));
        }
    }

    // A DNI may exist once across both roles.
    match registro::Entity::find_by_id(dni_num).one(&state.db).await {
        Ok(Some(_)) => {
            return Err(api_error(
                StatusCode::FORBIDDEN,
                "Ya estás registrado con otro usuario",
                "DNI_TAKEN",
            ));
        }
        Ok(None) => {}
        Err(db_error) => {
            error!("Failed to check DNI uniqueness: {}", db_error);
            return Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error en el servidor",
                "DATABASE_ERROR",
            ));
        }
    }

    let new_registro = registro::ActiveModel {
        dni: Set(dni_num),
        tipo_usuario: Set(tipo),
        nombres: Set(nombre.to_string()),
        apellidos: Set(apellido.to_string()),
        usuario: Set(username.to_string()),
        contrasena: Set(password.to_string()),
        correo: Set(email.to_string()),
        fecha_de_nacimiento: Set(birthday),
    };

    match new_registro.insert(&state.db).await {
        Ok(saved) => {
            info!(dni = saved.dni, "Identity registered");
            Ok((
                StatusCode::CREATED,
                Json(RegisterResponse {
                    success: true,
                    message: "Usuario registrado correctamente".to_string(),
                    nombres: saved.nombres,
                    apellidos: saved.apellidos,
                }),
            ))
        }
        Err(db_error) => {
            error!("Failed to insert identity: {}", db_error);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error en el servidor",
                "DATABASE_ERROR",
            ))
        }
    }
}

/// Doctor login: exact username match, plaintext password comparison.
#[utoipa::path(
    post,
    path = "/api/auth/login/doctor",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login accepted", body = DoctorLoginResponse),
        (status = 401, description = "Bad credentials", body = ErrorResponse),
        (status = 402, description = "Unknown user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login_doctor(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<DoctorLoginResponse>, ApiError> {
    let username = request.usuario.unwrap_or_default();
    let password = request.contrasena.unwrap_or_default();

    if contains_sql_chars(&password) {
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "Credenciales incorrectas",
            "INVALID_CREDENTIALS",
        ));
    }

    let row = registro::Entity::find()
        .filter(registro::Column::Usuario.eq(username.as_str()))
        .filter(registro::Column::TipoUsuario.eq(UserType::Doctor))
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Doctor login lookup failed: {}", db_error);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error en el servidor",
                "DATABASE_ERROR",
            )
        })?;

    let Some(row) = row else {
        return Err(api_error(
            StatusCode::PAYMENT_REQUIRED,
            "Credenciales incorrectas",
            "UNKNOWN_USER",
        ));
    };

    if row.contrasena != password {
        warn!(dni = row.dni, "Doctor login with wrong password");
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "Credenciales incorrectas",
            "INVALID_CREDENTIALS",
        ));
    }

    info!(dni = row.dni, "Doctor logged in");
    Ok(Json(DoctorLoginResponse {
        success: true,
        usuario: row.apellidos,
        dni: row.dni,
        role: UserType::Doctor.wire_role().to_string(),
    }))
}

/// Guardian login: trims credentials, matches the username
/// case-insensitively, reports the role as "user".
#[utoipa::path(
    post,
    path = "/api/auth/login/apoderado",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login accepted", body = ApoderadoLoginResponse),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Bad credentials", body = ErrorResponse),
        (status = 402, description = "Unknown user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login_apoderado(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApoderadoLoginResponse>, ApiError> {
    let username = request.usuario.unwrap_or_default().trim().to_string();
    let password = request.contrasena.unwrap_or_default().trim().to_string();

    if username.is_empty() || password.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Faltan credenciales",
            "MISSING_CREDENTIALS",
        ));
    }

    if contains_sql_chars(&password) {
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "Credenciales incorrectas",
            "INVALID_CREDENTIALS",
        ));
    }

    let row = registro::Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col(registro::Column::Usuario)))
                .eq(username.to_lowercase()),
        )
        .filter(registro::Column::TipoUsuario.eq(UserType::Apoderado))
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Guardian login lookup failed: {}", db_error);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error en el servidor",
                "DATABASE_ERROR",
            )
        })?;

    let Some(row) = row else {
        return Err(api_error(
            StatusCode::PAYMENT_REQUIRED,
            "Credenciales incorrectas",
            "UNKNOWN_USER",
        ));
    };

    if row.contrasena != password {
        warn!(dni = row.dni, "Guardian login with wrong password");
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "Credenciales incorrectas",
            "INVALID_CREDENTIALS",
        ));
    }

    info!(dni = row.dni, "Guardian logged in");
    Ok(Json(ApoderadoLoginResponse {
        success: true,
        nombres: row.nombres,
        apellidos: row.apellidos,
        dni: row.dni,
        role: UserType::Apoderado.wire_role().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_counts_across_the_whole_blacklist() {
        // Four hits pass, five reject.
        assert!(!contains_sql_chars("a'b\"c;d%"));
        assert!(contains_sql_chars("a'b\"c;d%e*"));
    }

    #[test]
    fn heuristic_counts_repeated_characters() {
        assert!(contains_sql_chars("====="));
        assert!(!contains_sql_chars("===="));
    }

    #[test]
    fn double_dash_counts_once_per_pair() {
        // "----" is two `--` hits plus nothing else.
        assert!(!contains_sql_chars("----"));
        assert!(contains_sql_chars("------;;;"));
    }

    #[test]
    fn ordinary_passwords_pass() {
        assert!(!contains_sql_chars("hunter2"));
        assert!(!contains_sql_chars("correct horse battery staple"));
    }
}
