use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

/// Builds a connection pool against the PostgreSQL database at [db_url]
pub async fn connect_sqlx(db_url: &str) -> Result<PgPool, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(2))
        .connect(db_url)
        .await
        .context("connecting to the database")?;

    Ok(pool)
}

/// Applies the SQL migrations under `migrations/` which create the `users` and `tasks` tables
pub async fn migrate(pool: &PgPool) -> Result<(), anyhow::Error> {
    info!("Applying database migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("running database migrations")?;

    Ok(())
}
