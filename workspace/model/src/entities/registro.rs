use sea_orm::entity::prelude::*;

/// Role stored in `registros.tipo_usuario`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserType {
    #[sea_orm(string_value = "doctor")]
    Doctor,
    #[sea_orm(string_value = "apoderado")]
    Apoderado,
}

impl UserType {
    /// Accepts the wire tags used by the API, where the guardian role
    /// appears both as "apoderado" and as "user".
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "doctor" => Some(Self::Doctor),
            "apoderado" | "user" => Some(Self::Apoderado),
            _ => None,
        }
    }

    /// Role name reported to clients on login.
    pub fn wire_role(&self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Apoderado => "user",
        }
    }
}

/// A registered identity, doctor or guardian.
/// Corresponds to the `registros` table of the MySQL schema.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "registros")]
pub struct Model {
    /// 8-digit national ID; globally unique across both roles, so it
    /// doubles as the key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub dni: i32,
    pub tipo_usuario: UserType,
    pub nombres: String,
    pub apellidos: String,
    /// Username; unique together with `tipo_usuario`.
    pub usuario: String,
    /// Stored in the clear; login compares by direct string equality.
    pub contrasena: String,
    pub correo: String,
    pub fecha_de_nacimiento: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A guardian can submit many intake forms.
    #[sea_orm(has_many = "super::paciente_asma::Entity")]
    PacienteAsma,
}

impl Related<super::paciente_asma::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PacienteAsma.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
