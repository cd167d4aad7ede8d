use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create registros table: all registered identities, doctors and
        // guardians, keyed by the national ID.
        manager
            .create_table(
                Table::create()
                    .table(Registros::Table)
                    .if_not_exists()
                    .col(integer(Registros::Dni).primary_key())
                    .col(string_len(Registros::TipoUsuario, 20))
                    .col(string(Registros::Nombres))
                    .col(string(Registros::Apellidos))
                    .col(string(Registros::Usuario))
                    .col(string(Registros::Contrasena))
                    .col(string(Registros::Correo))
                    .col(date(Registros::FechaDeNacimiento))
                    .to_owned(),
            )
            .await?;

        // The same username may exist once per role.
        manager
            .create_index(
                Index::create()
                    .name("idx_registros_usuario_tipo")
                    .table(Registros::Table)
                    .col(Registros::Usuario)
                    .col(Registros::TipoUsuario)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create pacientes_asma table: one row per submitted intake form.
        // The three result columns stay null until the predictor answers.
        // No FK to registros: identities can be removed by the user CRUD
        // while their submitted forms survive.
        manager
            .create_table(
                Table::create()
                    .table(PacientesAsma::Table)
                    .if_not_exists()
                    .col(pk_auto(PacientesAsma::Id))
                    .col(integer(PacientesAsma::CreadoPorDni))
                    .col(integer(PacientesAsma::Dni))
                    .col(string(PacientesAsma::Paciente))
                    .col(string(PacientesAsma::Genero))
                    .col(integer_null(PacientesAsma::Annos))
                    .col(date(PacientesAsma::FechaCita))
                    .col(string(PacientesAsma::Distrito))
                    .col(string_null(PacientesAsma::DistritoCod))
                    .col(double(PacientesAsma::HumedadPct))
                    .col(integer_null(PacientesAsma::HistorialFamiliarAsma))
                    .col(integer_null(PacientesAsma::FamiliaresAsma))
                    .col(integer_null(PacientesAsma::AntecedentesResp))
                    .col(integer_null(PacientesAsma::TipoEnfResp))
                    .col(integer_null(PacientesAsma::PresenciaMascotas))
                    .col(integer_null(PacientesAsma::CantidadMascotas))
                    .col(integer_null(PacientesAsma::TipoMascotas))
                    .col(integer_null(PacientesAsma::ExposicionAlergenos))
                    .col(integer_null(PacientesAsma::FrecSibilancias))
                    .col(integer_null(PacientesAsma::RinitisAlergica))
                    .col(integer_null(PacientesAsma::FrecActividadFisica))
                    .col(integer(PacientesAsma::IndiceAlergico))
                    .col(integer_null(PacientesAsma::Target))
                    .col(double_null(PacientesAsma::ProbabilidadRiesgo))
                    .col(text_null(PacientesAsma::Interpretacion))
                    .to_owned(),
            )
            .await?;

        // Read paths: forms by creator, and patient history by visit date.
        manager
            .create_index(
                Index::create()
                    .name("idx_pacientes_asma_creador")
                    .table(PacientesAsma::Table)
                    .col(PacientesAsma::CreadoPorDni)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pacientes_asma_dni_fecha")
                    .table(PacientesAsma::Table)
                    .col(PacientesAsma::Dni)
                    .col(PacientesAsma::FechaCita)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PacientesAsma::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Registros::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Registros {
    Table,
    Dni,
    TipoUsuario,
    Nombres,
    Apellidos,
    Usuario,
    Contrasena,
    Correo,
    FechaDeNacimiento,
}

#[derive(DeriveIden)]
enum PacientesAsma {
    Table,
    Id,
    CreadoPorDni,
    Dni,
    Paciente,
    Genero,
    Annos,
    FechaCita,
    Distrito,
    DistritoCod,
    HumedadPct,
    HistorialFamiliarAsma,
    FamiliaresAsma,
    AntecedentesResp,
    TipoEnfResp,
    PresenciaMascotas,
    CantidadMascotas,
    TipoMascotas,
    ExposicionAlergenos,
    FrecSibilancias,
    RinitisAlergica,
    FrecActividadFisica,
    IndiceAlergico,
    Target,
    ProbabilidadRiesgo,
    Interpretacion,
}
