//! The asthma intake form as submitted by a guardian, plus the values
//! derived from it before it reaches the database and the predictor.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::districts::resolve_humidity;

/// Pet-type answer that adds one extra point to the allergic index.
pub const HIGH_RISK_PET_TYPE: i32 = 2;

/// Derived allergic index: the sum of the rhinitis, allergen-exposure and
/// pet-presence answers, plus one point when the pet type is the
/// high-risk category.
pub fn allergic_index(rinitis: i32, exposicion: i32, mascotas: i32, tipo_mascotas: i32) -> i32 {
    rinitis
        + exposicion
        + mascotas
        + if tipo_mascotas == HIGH_RISK_PET_TYPE {
            1
        } else {
            0
        }
}

/// One intake form submission. The wire field names are the exact column
/// names the React front sends, several of which contain spaces; missing
/// feature answers deserialize to `None` and count as 0.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IntakeSubmission {
    /// Patient DNI; the front sends either spelling.
    #[serde(rename = "DNI", alias = "dni")]
    pub dni: String,
    /// Patient full name.
    pub paciente: String,
    #[serde(default)]
    pub genero: Option<i32>,
    /// Visit date, `YYYY-MM-DD`.
    pub fecha_cita: String,
    pub distrito: String,
    #[serde(default)]
    pub distrito_cod: Option<String>,
    #[serde(default, rename = "humedad (%)")]
    pub humedad: Option<f64>,
    #[serde(default)]
    pub annos: Option<i32>,
    #[serde(default, rename = "historial familiar de asma")]
    pub historial_familiar_asma: Option<i32>,
    #[serde(default, rename = "familiares con asma")]
    pub familiares_asma: Option<i32>,
    #[serde(default, rename = "antecedentes de enfermedades respiratorias")]
    pub antecedentes_resp: Option<i32>,
    #[serde(default, rename = "tipo de enfermedades respiratorias")]
    pub tipo_enf_resp: Option<i32>,
    #[serde(default, rename = "presencia de mascotas en el hogar")]
    pub presencia_mascotas: Option<i32>,
    #[serde(default, rename = "cantidad de mascotas")]
    pub cantidad_mascotas: Option<i32>,
    #[serde(default, rename = "tipo de mascotas")]
    pub tipo_mascotas: Option<i32>,
    #[serde(default, rename = "exposicion a alergenos")]
    pub exposicion_alergenos: Option<i32>,
    #[serde(default, rename = "frecuencia de episodios de sibilancias")]
    pub frec_sibilancias: Option<i32>,
    #[serde(default, rename = "presencia de rinitis alergica u otras alergias")]
    pub rinitis_alergica: Option<i32>,
    #[serde(default, rename = "frecuencia de actividad fisica")]
    pub frec_actividad_fisica: Option<i32>,
}

impl IntakeSubmission {
    /// Allergic index derived from the four allergy-related answers.
    pub fn allergic_index(&self) -> i32 {
        allergic_index(
            self.rinitis_alergica.unwrap_or(0),
            self.exposicion_alergenos.unwrap_or(0),
            self.presencia_mascotas.unwrap_or(0),
            self.tipo_mascotas.unwrap_or(0),
        )
    }

    /// Humidity to persist: the submitted reading wins over the district
    /// fallback table.
    pub fn resolved_humidity(&self) -> f64 {
        resolve_humidity(self.humedad, &self.distrito)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allergic_index_sums_the_four_answers() {
        assert_eq!(allergic_index(2, 1, 1, 0), 4);
        assert_eq!(allergic_index(0, 0, 0, 0), 0);
    }

    #[test]
    fn allergic_index_adds_bonus_for_high_risk_pet() {
        assert_eq!(allergic_index(2, 1, 1, HIGH_RISK_PET_TYPE), 5);
        assert_eq!(allergic_index(0, 0, 0, HIGH_RISK_PET_TYPE), 1);
        // Any other pet type gets no bonus.
        assert_eq!(allergic_index(0, 0, 0, 3), 0);
    }

    #[test]
    fn deserializes_the_spaced_wire_names() {
        let submission: IntakeSubmission = serde_json::from_value(serde_json::json!({
            "DNI": "12345678",
            "paciente": "Ana Ruiz",
            "fecha_cita": "2024-05-01",
            "distrito": "Miraflores",
            "humedad (%)": 80.5,
            "presencia de rinitis alergica u otras alergias": 2,
            "exposicion a alergenos": 1,
            "presencia de mascotas en el hogar": 1,
            "tipo de mascotas": 2
        }))
        .unwrap();

        assert_eq!(submission.humedad, Some(80.5));
        assert_eq!(submission.allergic_index(), 5);
        assert_eq!(submission.annos, None);
    }

    #[test]
    fn accepts_the_lowercase_dni_spelling() {
        let submission: IntakeSubmission = serde_json::from_value(serde_json::json!({
            "dni": "87654321",
            "paciente": "Ana Ruiz",
            "fecha_cita": "2024-05-01",
            "distrito": "Comas"
        }))
        .unwrap();

        assert_eq!(submission.dni, "87654321");
        assert_eq!(submission.resolved_humidity(), 85.6);
    }

    #[test]
    fn missing_humidity_resolves_per_district() {
        let submission: IntakeSubmission = serde_json::from_value(serde_json::json!({
            "DNI": "12345678",
            "paciente": "Ana Ruiz",
            "fecha_cita": "2024-05-01",
            "distrito": "Miraflores"
        }))
        .unwrap();

        assert_eq!(submission.resolved_humidity(), 75.3);
    }
}
