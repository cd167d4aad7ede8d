use sea_orm::entity::prelude::*;

/// One submitted intake form, enriched in place with the prediction
/// results once the external model has scored it.
///
/// The row is inserted with the three result columns null; the
/// post-prediction update locates it again by the (dni, fecha_cita,
/// paciente, humedad_pct, indice_alergico) tuple rather than by `id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pacientes_asma")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// DNI of the guardian who submitted the form.
    pub creado_por_dni: i32,
    /// DNI of the patient the form is about.
    pub dni: i32,
    pub paciente: String,
    pub genero: String,
    pub annos: Option<i32>,
    pub fecha_cita: Date,
    pub distrito: String,
    pub distrito_cod: Option<String>,
    /// Relative humidity (%): caller-supplied or the district fallback.
    pub humedad_pct: f64,
    pub historial_familiar_asma: Option<i32>,
    pub familiares_asma: Option<i32>,
    pub antecedentes_resp: Option<i32>,
    pub tipo_enf_resp: Option<i32>,
    pub presencia_mascotas: Option<i32>,
    pub cantidad_mascotas: Option<i32>,
    pub tipo_mascotas: Option<i32>,
    pub exposicion_alergenos: Option<i32>,
    pub frec_sibilancias: Option<i32>,
    pub rinitis_alergica: Option<i32>,
    pub frec_actividad_fisica: Option<i32>,
    pub indice_alergico: i32,
    /// Null until the predictor has answered.
    pub target: Option<i32>,
    pub probabilidad_riesgo: Option<f64>,
    pub interpretacion: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The guardian identity that created this form. Kept as a SeaORM
    /// relation only; the schema carries no FK so identities can be
    /// removed while their submitted forms survive.
    #[sea_orm(
        belongs_to = "super::registro::Entity",
        from = "Column::CreadoPorDni",
        to = "super::registro::Column::Dni"
    )]
    Registro,
}

impl Related<super::registro::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registro.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
