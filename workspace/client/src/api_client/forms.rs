use common::DataResponse;
use serde::Deserialize;

use super::{ApiClient, ClientError};

/// One row of the guardian's own form list.
#[derive(Debug, Clone, Deserialize)]
pub struct FormSummary {
    pub dni: i32,
    pub paciente: String,
    pub fecha_cita: String,
    pub annos: Option<i32>,
}

/// One row of the doctor-facing recent list.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentForm {
    pub paciente: String,
    pub dni: i32,
    pub fecha_cita: String,
    pub annos: Option<i32>,
    pub genero: String,
    pub distrito: String,
    pub target: Option<i32>,
    pub probabilidad_riesgo: Option<f64>,
    pub interpretacion: Option<String>,
}

/// One row of a patient's visit history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRow {
    pub dni: i32,
    pub paciente: String,
    pub fecha_cita: String,
    pub annos: Option<i32>,
    pub target: Option<i32>,
    pub probabilidad_riesgo: Option<f64>,
    pub interpretacion: Option<String>,
}

impl ApiClient {
    /// Forms submitted by the calling guardian, newest first.
    pub async fn my_forms(&self, guardian_dni: &str) -> Result<Vec<FormSummary>, ClientError> {
        let response: DataResponse<Vec<FormSummary>> = self
            .get_json("/api/forms/mine", &[], &[("x-dni", guardian_dni)])
            .await?;
        Ok(response.data)
    }

    /// Recent forms across all patients (doctor role).
    pub async fn recent_forms(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RecentForm>, ClientError> {
        let limit = limit.to_string();
        let offset = offset.to_string();
        let response: DataResponse<Vec<RecentForm>> = self
            .get_json(
                "/api/forms/recent",
                &[("limit", limit.as_str()), ("offset", offset.as_str())],
                &[("x-role", "doctor")],
            )
            .await?;
        Ok(response.data)
    }

    /// Full detail of one form, or `None` when the triple matches
    /// nothing (doctor role). The detail row keeps the spaced column
    /// names, so it is exposed as raw JSON.
    pub async fn form_detail(
        &self,
        dni: &str,
        fecha: &str,
        paciente: &str,
    ) -> Result<Option<serde_json::Value>, ClientError> {
        let response: DataResponse<Option<serde_json::Value>> = self
            .get_json(
                "/api/forms/detail",
                &[("dni", dni), ("fecha", fecha), ("paciente", paciente)],
                &[("x-role", "doctor")],
            )
            .await?;
        Ok(response.data)
    }

    /// All historical forms for one patient DNI (doctor role).
    pub async fn patient_history(&self, dni: &str) -> Result<Vec<HistoryRow>, ClientError> {
        let response: DataResponse<Vec<HistoryRow>> = self
            .get_json(&format!("/api/forms/{}", dni), &[], &[("x-role", "doctor")])
            .await?;
        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_form_deserializes_with_null_results() {
        let row: RecentForm = serde_json::from_str(
            r#"{"paciente":"Ana Ruiz","dni":12345678,"fecha_cita":"2024-05-01",
                "annos":7,"genero":"1","distrito":"Miraflores",
                "target":null,"probabilidad_riesgo":null,"interpretacion":null}"#,
        )
        .unwrap();
        assert_eq!(row.target, None);
        assert_eq!(row.fecha_cita, "2024-05-01");
    }
}
