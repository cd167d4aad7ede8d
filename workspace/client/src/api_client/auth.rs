use serde::{Deserialize, Serialize};

use super::{ApiClient, ClientError};

/// Registration payload (mirrors the backend request).
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub nombre: String,
    pub apellido: String,
    pub dni: String,
    pub tipo_usuario: String,
    /// Birth date, `YYYY-MM-DD`.
    pub birthday: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterOutcome {
    pub success: bool,
    pub message: String,
    pub nombres: String,
    pub apellidos: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    usuario: &'a str,
    #[serde(rename = "contraseña")]
    contrasena: &'a str,
}

/// Doctor login reply; `usuario` carries the display surname.
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorSession {
    pub success: bool,
    pub usuario: String,
    pub dni: i32,
    pub role: String,
}

/// Guardian login reply; the role comes back as "user".
#[derive(Debug, Clone, Deserialize)]
pub struct GuardianSession {
    pub success: bool,
    pub nombres: String,
    pub apellidos: String,
    pub dni: i32,
    pub role: String,
}

impl ApiClient {
    /// Register a new identity.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterOutcome, ClientError> {
        self.post_json("/api/auth/register", request, &[]).await
    }

    /// Log in as a doctor.
    pub async fn login_doctor(
        &self,
        usuario: &str,
        contrasena: &str,
    ) -> Result<DoctorSession, ClientError> {
        self.post_json(
            "/api/auth/login/doctor",
            &LoginRequest { usuario, contrasena },
            &[],
        )
        .await
    }

    /// Log in as a guardian.
    pub async fn login_apoderado(
        &self,
        usuario: &str,
        contrasena: &str,
    ) -> Result<GuardianSession, ClientError> {
        self.post_json(
            "/api/auth/login/apoderado",
            &LoginRequest { usuario, contrasena },
            &[],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_uses_the_spanish_password_key() {
        let value = serde_json::to_value(LoginRequest {
            usuario: "mruiz",
            contrasena: "secreto",
        })
        .unwrap();
        assert_eq!(value["usuario"], "mruiz");
        assert_eq!(value["contraseña"], "secreto");
    }

    #[test]
    fn guardian_session_deserializes() {
        let session: GuardianSession = serde_json::from_str(
            r#"{"success":true,"nombres":"Maria","apellidos":"Ruiz","dni":11223344,"role":"user"}"#,
        )
        .unwrap();
        assert_eq!(session.dni, 11223344);
        assert_eq!(session.role, "user");
    }
}
