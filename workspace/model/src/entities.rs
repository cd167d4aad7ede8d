//! This file serves as the root for all SeaORM entity modules.
//! The data models mirror the two persistent tables of the MySQL
//! schema, adapted for Rust's type system and the SeaORM framework.

pub mod paciente_asma;
pub mod registro;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::paciente_asma::Entity as PacienteAsma;
    pub use super::registro::Entity as Registro;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait,
        QueryFilter, QueryOrder, Set,
    };

    use super::*;
    use prelude::*;
    use registro::UserType;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn form(creator: i32, patient: i32, name: &str, date: NaiveDate) -> paciente_asma::ActiveModel {
        paciente_asma::ActiveModel {
            creado_por_dni: Set(creator),
            dni: Set(patient),
            paciente: Set(name.to_string()),
            genero: Set("1".to_string()),
            annos: Set(Some(7)),
            fecha_cita: Set(date),
            distrito: Set("Miraflores".to_string()),
            distrito_cod: Set(Some("15".to_string())),
            humedad_pct: Set(75.3),
            rinitis_alergica: Set(Some(2)),
            exposicion_alergenos: Set(Some(1)),
            presencia_mascotas: Set(Some(1)),
            tipo_mascotas: Set(Some(2)),
            indice_alergico: Set(5),
            target: Set(None),
            probabilidad_riesgo: Set(None),
            interpretacion: Set(None),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        // One guardian, one doctor
        let guardian = registro::ActiveModel {
            dni: Set(11223344),
            tipo_usuario: Set(UserType::Apoderado),
            nombres: Set("Maria".to_string()),
            apellidos: Set("Ruiz".to_string()),
            usuario: Set("mruiz".to_string()),
            contrasena: Set("secreto".to_string()),
            correo: Set("mruiz@example.com".to_string()),
            fecha_de_nacimiento: Set(NaiveDate::from_ymd_opt(1990, 3, 14).unwrap()),
        }
        .insert(&db)
        .await?;

        registro::ActiveModel {
            dni: Set(55667788),
            tipo_usuario: Set(UserType::Doctor),
            nombres: Set("Jorge".to_string()),
            apellidos: Set("Garcia".to_string()),
            usuario: Set("jgarcia".to_string()),
            contrasena: Set("doctor123".to_string()),
            correo: Set("garcia@asma.com".to_string()),
            fecha_de_nacimiento: Set(NaiveDate::from_ymd_opt(1980, 7, 1).unwrap()),
        }
        .insert(&db)
        .await?;

        // Two visits for the same patient, newest last
        let first = form(
            guardian.dni,
            12345678,
            "Ana Ruiz",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
        .insert(&db)
        .await?;
        form(
            guardian.dni,
            12345678,
            "Ana Ruiz",
            NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
        )
        .insert(&db)
        .await?;

        // Result columns start out null
        assert_eq!(first.target, None);
        assert_eq!(first.probabilidad_riesgo, None);
        assert_eq!(first.interpretacion, None);

        // Identities are keyed by DNI
        let registros = Registro::find().all(&db).await?;
        assert_eq!(registros.len(), 2);
        assert!(registros.iter().any(|r| r.tipo_usuario == UserType::Doctor));

        // Patient history comes back newest first
        let history = PacienteAsma::find()
            .filter(paciente_asma::Column::Dni.eq(12345678))
            .order_by_desc(paciente_asma::Column::FechaCita)
            .all(&db)
            .await?;
        assert_eq!(history.len(), 2);
        assert_eq!(
            history[0].fecha_cita,
            NaiveDate::from_ymd_opt(2024, 8, 15).unwrap()
        );

        // Filling in the prediction results touches exactly one row
        let mut scored: paciente_asma::ActiveModel = first.into();
        scored.target = Set(Some(1));
        scored.probabilidad_riesgo = Set(Some(0.87));
        scored.interpretacion = Set(Some("Riesgo ALTO (positivo)".to_string()));
        let scored = scored.update(&db).await?;
        assert_eq!(scored.target, Some(1));

        let still_pending = PacienteAsma::find()
            .filter(paciente_asma::Column::Target.is_null())
            .all(&db)
            .await?;
        assert_eq!(still_pending.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_user_type_tags() {
        assert_eq!(UserType::from_tag("doctor"), Some(UserType::Doctor));
        assert_eq!(UserType::from_tag("apoderado"), Some(UserType::Apoderado));
        assert_eq!(UserType::from_tag("user"), Some(UserType::Apoderado));
        assert_eq!(UserType::from_tag("admin"), None);
        assert_eq!(UserType::Apoderado.wire_role(), "user");
    }
}
