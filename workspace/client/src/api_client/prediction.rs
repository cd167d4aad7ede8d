use common::IntakeSubmission;
use serde::Deserialize;

use super::{ApiClient, ClientError};

/// Reply from a successful intake submission.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionOutcome {
    pub success: bool,
    pub target: i32,
    pub probabilidad_riesgo: f64,
    pub interpretacion: String,
}

impl ApiClient {
    /// Submit an intake form for scoring on behalf of a guardian.
    pub async fn submit_intake(
        &self,
        guardian_dni: &str,
        submission: &IntakeSubmission,
    ) -> Result<PredictionOutcome, ClientError> {
        self.post_json("/prediccion", submission, &[("x-dni", guardian_dni)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_deserializes() {
        let outcome: PredictionOutcome = serde_json::from_str(
            r#"{"success":true,"target":1,"probabilidad_riesgo":0.8731,
                "interpretacion":"Riesgo ALTO (positivo)"}"#,
        )
        .unwrap();
        assert_eq!(outcome.target, 1);
        assert!(outcome.success);
    }
}
