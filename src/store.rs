//! In-memory demo directory behind the `/api/doctors` and `/api/patients`
//! admin screens. The store is injected through `AppState` so tests can
//! substitute their own instance. Records live for the lifetime of the
//! process only.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// A demo doctor record. The password round-trips through the store;
/// the list endpoint strips it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorRecord {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub specialty: String,
}

/// Fields accepted when creating or patching a demo doctor. Absent
/// fields keep their previous value on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DoctorPatch {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
}

/// A demo patient record: an id plus whatever fields the client sent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientRecord {
    pub id: i64,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

#[async_trait::async_trait]
pub trait DirectoryStore: Send + Sync + fmt::Debug {
    async fn list_doctors(&self) -> Vec<DoctorRecord>;
    async fn create_doctor(&self, patch: DoctorPatch) -> DoctorRecord;
    async fn update_doctor(&self, id: i64, patch: DoctorPatch) -> Option<DoctorRecord>;
    async fn delete_doctor(&self, id: i64) -> bool;

    async fn list_patients(&self) -> Vec<PatientRecord>;
    async fn create_patient(&self, fields: Map<String, Value>) -> PatientRecord;
    async fn update_patient(&self, id: i64, fields: Map<String, Value>) -> Option<PatientRecord>;
    async fn delete_patient(&self, id: i64) -> bool;
}

/// Default process-lifetime store.
#[derive(Debug)]
pub struct InMemoryDirectory {
    doctors: RwLock<Vec<DoctorRecord>>,
    patients: RwLock<Vec<PatientRecord>>,
    next_id: AtomicI64,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            doctors: RwLock::new(Vec::new()),
            patients: RwLock::new(Vec::new()),
            // Seed records use small ids; allocated ids start well above.
            next_id: AtomicI64::new(1000),
        }
    }

    /// Store seeded with the demo records the admin screens expect.
    pub fn with_demo_data() -> Self {
        let doctors = vec![
            DoctorRecord {
                id: 1,
                username: "doctor1".to_string(),
                password: "doctor123".to_string(),
                name: "Dr. García".to_string(),
                email: "garcia@asma.com".to_string(),
                specialty: "Neumología".to_string(),
            },
            DoctorRecord {
                id: 2,
                username: "doctor2".to_string(),
                password: "doctor123".to_string(),
                name: "Dr. López".to_string(),
                email: "lopez@asma.com".to_string(),
                specialty: "Alergología".to_string(),
            },
        ];

        let demo_patient = serde_json::json!({
            "dni": "12345678",
            "paciente": "Juan Pérez García",
            "annos": 25,
            "sexo": "M",
            "des_diagnostico": "Asma leve persistente",
            "distrito": "Miraflores",
            "humedad": 65,
            "historial_familiar_asma": "SI",
            "presencia_mascotas": "SI",
            "exposicion_alergenos": "SI",
            "rinitis_alergica": "SI",
            "diagnostico_asma": "Asma leve",
            "tipo_mascotas": "PERRO",
            "cantidad_mascotas": 2,
            "imc": 22.5,
            "createdBy": 2
        });
        let patients = vec![PatientRecord {
            id: 1,
            fields: demo_patient.as_object().cloned().unwrap_or_default(),
        }];

        Self {
            doctors: RwLock::new(doctors),
            patients: RwLock::new(patients),
            next_id: AtomicI64::new(1000),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DirectoryStore for InMemoryDirectory {
    async fn list_doctors(&self) -> Vec<DoctorRecord> {
        self.doctors.read().await.clone()
    }

    async fn create_doctor(&self, patch: DoctorPatch) -> DoctorRecord {
        let record = DoctorRecord {
            id: self.allocate_id(),
            username: patch.username.unwrap_or_default(),
            password: patch.password.unwrap_or_default(),
            name: patch.name.unwrap_or_default(),
            email: patch.email.unwrap_or_default(),
            specialty: patch.specialty.unwrap_or_default(),
        };
        self.doctors.write().await.push(record.clone());
        record
    }

    async fn update_doctor(&self, id: i64, patch: DoctorPatch) -> Option<DoctorRecord> {
        let mut doctors = self.doctors.write().await;
        let record = doctors.iter_mut().find(|d| d.id == id)?;
        if let Some(username) = patch.username {
            record.username = username;
        }
        if let Some(password) = patch.password {
            record.password = password;
        }
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(email) = patch.email {
            record.email = email;
        }
        if let Some(specialty) = patch.specialty {
            record.specialty = specialty;
        }
        Some(record.clone())
    }

    async fn delete_doctor(&self, id: i64) -> bool {
        let mut doctors = self.doctors.write().await;
        let before = doctors.len();
        doctors.retain(|d| d.id != id);
        doctors.len() < before
    }

    async fn list_patients(&self) -> Vec<PatientRecord> {
        self.patients.read().await.clone()
    }

    async fn create_patient(&self, fields: Map<String, Value>) -> PatientRecord {
        let record = PatientRecord {
            id: self.allocate_id(),
            fields,
        };
        self.patients.write().await.push(record.clone());
        record
    }

    async fn update_patient(&self, id: i64, fields: Map<String, Value>) -> Option<PatientRecord> {
        let mut patients = self.patients.write().await;
        let record = patients.iter_mut().find(|p| p.id == id)?;
        for (key, value) in fields {
            record.fields.insert(key, value);
        }
        Some(record.clone())
    }

    async fn delete_patient(&self, id: i64) -> bool {
        let mut patients = self.patients.write().await;
        let before = patients.len();
        patients.retain(|p| p.id != id);
        patients.len() < before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn doctor_crud_round_trip() {
        let store = InMemoryDirectory::new();

        let created = store
            .create_doctor(DoctorPatch {
                username: Some("doctor9".to_string()),
                password: Some("pw".to_string()),
                name: Some("Dr. Prueba".to_string()),
                email: Some("prueba@asma.com".to_string()),
                specialty: Some("Neumología".to_string()),
            })
            .await;

        assert_eq!(store.list_doctors().await.len(), 1);

        let updated = store
            .update_doctor(
                created.id,
                DoctorPatch {
                    specialty: Some("Alergología".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.specialty, "Alergología");
        // Untouched fields survive the patch.
        assert_eq!(updated.username, "doctor9");

        assert!(store.delete_doctor(created.id).await);
        assert!(!store.delete_doctor(created.id).await);
    }

    #[tokio::test]
    async fn patient_update_merges_fields() {
        let store = InMemoryDirectory::new();
        let mut fields = Map::new();
        fields.insert("paciente".to_string(), Value::from("Ana"));

        let created = store.create_patient(fields).await;

        let mut patch = Map::new();
        patch.insert("distrito".to_string(), Value::from("Comas"));
        let updated = store.update_patient(created.id, patch).await.unwrap();

        assert_eq!(updated.fields["paciente"], "Ana");
        assert_eq!(updated.fields["distrito"], "Comas");
        assert!(store.update_patient(9999, Map::new()).await.is_none());
    }

    #[tokio::test]
    async fn demo_seed_has_the_expected_records() {
        let store = InMemoryDirectory::with_demo_data();
        let doctors = store.list_doctors().await;
        assert_eq!(doctors.len(), 2);
        assert_eq!(doctors[0].username, "doctor1");
        assert_eq!(store.list_patients().await.len(), 1);
    }
}
