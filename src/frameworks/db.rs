use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::frameworks::config::StorageConfig;

// Pool shared by every postgres-backed store.
pub async fn connect_pool(database_url: &str, storage: &StorageConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(storage.max_connections)
        .acquire_timeout(storage.acquire_timeout())
        .connect(database_url)
        .await
}

// Creates the catalog (seeding the unlimited template), ledger, appointment,
// guest and exercise plan tables. Already applied migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
    MIGRATOR.run(pool).await?;
    tracing::info!(migrations = MIGRATOR.iter().count(), "database schema is current");
    Ok(())
}
