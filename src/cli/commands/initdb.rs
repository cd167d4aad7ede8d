use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::info;

/// Create or upgrade the schema by running all pending migrations.
pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database at {}", database_url);

    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("failed to connect to '{database_url}'"))?;

    Migrator::up(&db, None)
        .await
        .context("failed to run database migrations")?;

    info!("Database initialization completed");
    Ok(())
}
