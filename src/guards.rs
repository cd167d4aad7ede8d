//! Trust-header guards. Callers are identified by a raw `x-dni` header
//! and doctors by `x-role: doctor`; there is no cryptographic session.

use axum::http::{HeaderMap, StatusCode};

use crate::schemas::{ApiError, api_error};

pub const DNI_HEADER: &str = "x-dni";
pub const ROLE_HEADER: &str = "x-role";

/// An 8-digit numeric DNI.
pub fn is_valid_dni(value: &str) -> bool {
    value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Require a valid guardian DNI header and return it.
pub fn require_dni(headers: &HeaderMap) -> Result<i32, ApiError> {
    let dni = headers
        .get(DNI_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if !is_valid_dni(dni) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Falta header x-dni válido (8 dígitos)",
            "MISSING_DNI_HEADER",
        ));
    }

    dni.parse().map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            "Falta header x-dni válido (8 dígitos)",
            "MISSING_DNI_HEADER",
        )
    })
}

/// Require the doctor role header.
pub fn require_doctor(headers: &HeaderMap) -> Result<(), ApiError> {
    let role = headers
        .get(ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if role != "doctor" {
        return Err(api_error(
            StatusCode::FORBIDDEN,
            "Solo médicos pueden acceder a esta ruta",
            "DOCTOR_ONLY",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        map
    }

    #[test]
    fn dni_must_be_eight_digits() {
        assert!(is_valid_dni("12345678"));
        assert!(!is_valid_dni("1234567"));
        assert!(!is_valid_dni("123456789"));
        assert!(!is_valid_dni("1234567a"));
        assert!(!is_valid_dni(""));
    }

    #[test]
    fn missing_or_bad_dni_header_is_rejected() {
        assert!(require_dni(&HeaderMap::new()).is_err());
        assert!(require_dni(&headers("x-dni", "abc")).is_err());
        assert_eq!(require_dni(&headers("x-dni", "12345678")).unwrap(), 12345678);
    }

    #[test]
    fn doctor_role_is_required_verbatim() {
        assert!(require_doctor(&HeaderMap::new()).is_err());
        assert!(require_doctor(&headers("x-role", "admin")).is_err());
        assert!(require_doctor(&headers("x-role", "doctor")).is_ok());
    }
}
