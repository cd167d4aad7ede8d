//! HTTP client for the external asthma-risk prediction microservice.
//!
//! The service exposes `POST /prediccion`, taking the intake features
//! under the exact column names the model was trained with (several
//! contain spaces) and returning a risk probability, a 0/1
//! classification and a human-readable interpretation.

use std::time::Duration;

use common::IntakeSubmission;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument};

/// Default per-request timeout for the predictor call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Error types for the predictor call.
#[derive(Error, Debug)]
pub enum PredictorError {
    /// Transport-level failure: connect error, timeout, malformed body.
    #[error("predictor request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The predictor answered with a non-2xx status.
    #[error("predictor returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl PredictorError {
    /// Upstream HTTP status, when the failure was a non-2xx response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            PredictorError::Status { status, .. } => Some(*status),
            PredictorError::Transport(err) => err.status().map(|s| s.as_u16()),
        }
    }

    /// Upstream detail suitable for echoing back to the API caller.
    pub fn detail(&self) -> String {
        match self {
            PredictorError::Status { body, .. } => body.clone(),
            PredictorError::Transport(err) => err.to_string(),
        }
    }
}

/// Feature payload sent to the predictor. Field names are the literal
/// column names the model expects, spaces included.
#[derive(Debug, Clone, Serialize)]
pub struct FeaturePayload {
    pub dni: String,
    pub paciente: String,
    pub genero: i32,
    pub fecha_cita: String,
    pub distrito: String,
    #[serde(rename = "humedad (%)")]
    pub humedad: f64,
    pub annos: i32,
    #[serde(rename = "historial familiar de asma")]
    pub historial_familiar_asma: i32,
    #[serde(rename = "familiares con asma")]
    pub familiares_asma: i32,
    #[serde(rename = "antecedentes de enfermedades respiratorias")]
    pub antecedentes_resp: i32,
    #[serde(rename = "tipo de enfermedades respiratorias")]
    pub tipo_enf_resp: i32,
    #[serde(rename = "presencia de mascotas en el hogar")]
    pub presencia_mascotas: i32,
    #[serde(rename = "cantidad de mascotas")]
    pub cantidad_mascotas: i32,
    #[serde(rename = "tipo de mascotas")]
    pub tipo_mascotas: i32,
    #[serde(rename = "exposicion a alergenos")]
    pub exposicion_alergenos: i32,
    #[serde(rename = "frecuencia de episodios de sibilancias")]
    pub frec_sibilancias: i32,
    #[serde(rename = "presencia de rinitis alergica u otras alergias")]
    pub rinitis_alergica: i32,
    #[serde(rename = "frecuencia de actividad fisica")]
    pub frec_actividad_fisica: i32,
    pub indice_alergico: i32,
}

impl FeaturePayload {
    /// Build the predictor payload from a validated submission plus the
    /// already-derived humidity and allergic index. Missing answers are
    /// sent as 0, matching what the model was trained on.
    pub fn from_submission(submission: &IntakeSubmission, humedad: f64, indice_alergico: i32) -> Self {
        Self {
            dni: submission.dni.trim().to_string(),
            paciente: submission.paciente.trim().to_string(),
            genero: submission.genero.unwrap_or(0),
            fecha_cita: submission.fecha_cita.trim().to_string(),
            distrito: submission.distrito.trim().to_string(),
            humedad,
            annos: submission.annos.unwrap_or(0),
            historial_familiar_asma: submission.historial_familiar_asma.unwrap_or(0),
            familiares_asma: submission.familiares_asma.unwrap_or(0),
            antecedentes_resp: submission.antecedentes_resp.unwrap_or(0),
            tipo_enf_resp: submission.tipo_enf_resp.unwrap_or(0),
            presencia_mascotas: submission.presencia_mascotas.unwrap_or(0),
            cantidad_mascotas: submission.cantidad_mascotas.unwrap_or(0),
            tipo_mascotas: submission.tipo_mascotas.unwrap_or(0),
            exposicion_alergenos: submission.exposicion_alergenos.unwrap_or(0),
            frec_sibilancias: submission.frec_sibilancias.unwrap_or(0),
            rinitis_alergica: submission.rinitis_alergica.unwrap_or(0),
            frec_actividad_fisica: submission.frec_actividad_fisica.unwrap_or(0),
            indice_alergico,
        }
    }
}

/// Raw predictor response. The service has shipped the classification
/// under both the `target` and `target_pred` spellings; both are
/// accepted, and every field has a defined default.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub probabilidad_riesgo: Option<f64>,
    #[serde(default)]
    pub interpretacion: Option<String>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub target_pred: Option<f64>,
}

impl Prediction {
    /// Risk probability in [0, 1], defaulting to 0 when absent.
    pub fn probability(&self) -> f64 {
        self.probabilidad_riesgo.unwrap_or(0.0)
    }

    /// Free-text interpretation, defaulting to the empty string.
    pub fn interpretation(&self) -> String {
        self.interpretacion.clone().unwrap_or_default()
    }

    /// Binary classification: `target` wins over `target_pred`, and a
    /// response carrying neither classifies as 0.
    pub fn classification(&self) -> i32 {
        self.target.or(self.target_pred).unwrap_or(0.0) as i32
    }
}

/// Client for the prediction microservice.
#[derive(Clone, Debug)]
pub struct PredictorClient {
    base_url: String,
    http: reqwest::Client,
}

impl PredictorClient {
    /// Create a client for the service at `base_url` with a fixed
    /// per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Full URL of the prediction endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/prediccion", self.base_url)
    }

    /// Score one intake form. Any timeout, connection failure or non-2xx
    /// response is an error; there are no retries.
    #[instrument(skip(self, payload), fields(url = %self.endpoint()))]
    pub async fn predict(&self, payload: &FeaturePayload) -> Result<Prediction, PredictorError> {
        let url = self.endpoint();
        debug!("Calling prediction service at {}", url);

        let response = self.http.post(&url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Prediction service rejected the request");
            return Err(PredictorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let prediction = response.json::<Prediction>().await?;
        debug!(
            probability = prediction.probability(),
            classification = prediction.classification(),
            "Prediction received"
        );
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> IntakeSubmission {
        serde_json::from_value(serde_json::json!({
            "DNI": "12345678",
            "paciente": "  Ana Ruiz  ",
            "fecha_cita": "2024-05-01",
            "distrito": "Miraflores",
            "annos": 7,
            "presencia de rinitis alergica u otras alergias": 2,
            "exposicion a alergenos": 1,
            "presencia de mascotas en el hogar": 1,
            "tipo de mascotas": 2
        }))
        .unwrap()
    }

    #[test]
    fn payload_serializes_the_model_column_names() {
        let payload = FeaturePayload::from_submission(&submission(), 75.3, 5);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["humedad (%)"], 75.3);
        assert_eq!(value["presencia de rinitis alergica u otras alergias"], 2);
        assert_eq!(value["tipo de mascotas"], 2);
        assert_eq!(value["indice_alergico"], 5);
        // Missing answers are sent as 0, not omitted.
        assert_eq!(value["familiares con asma"], 0);
        assert_eq!(value["paciente"], "Ana Ruiz");
    }

    #[test]
    fn response_defaults_apply_when_fields_are_absent() {
        let prediction: Prediction = serde_json::from_str("{}").unwrap();
        assert_eq!(prediction.probability(), 0.0);
        assert_eq!(prediction.interpretation(), "");
        assert_eq!(prediction.classification(), 0);
    }

    #[test]
    fn classification_accepts_both_spellings() {
        let with_target: Prediction =
            serde_json::from_value(serde_json::json!({"target": 1, "target_pred": 0})).unwrap();
        assert_eq!(with_target.classification(), 1);

        let with_target_pred: Prediction =
            serde_json::from_value(serde_json::json!({"target_pred": 1})).unwrap();
        assert_eq!(with_target_pred.classification(), 1);
    }

    #[test]
    fn full_response_round_trips() {
        let prediction: Prediction = serde_json::from_value(serde_json::json!({
            "target": 1,
            "probabilidad_riesgo": 0.8731,
            "interpretacion": "Riesgo ALTO (positivo)",
            "umbral": 0.5
        }))
        .unwrap();

        assert_eq!(prediction.probability(), 0.8731);
        assert_eq!(prediction.interpretation(), "Riesgo ALTO (positivo)");
        assert_eq!(prediction.classification(), 1);
    }
}
