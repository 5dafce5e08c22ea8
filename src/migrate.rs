//! Database migration utilities

use std::str::FromStr;

use sqlx::{
    Sqlite, SqlitePool,
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use sqlx_migrator::{Migrate, Plan};

use crate::Config;

/// Opens the pool, creating the database file when missing.
pub async fn connect(config: &Config) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database.url)?.create_if_missing(true);

    Ok(SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(options)
        .await?)
}

pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;
    nutriplan_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(())
}

pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    tracing::info!(url = %config.database.url, "Migrating database");

    let pool = connect(config).await?;
    run_migrations(&pool).await?;
    pool.close().await;

    tracing::info!("Database migrated");

    Ok(())
}

/// Drops the database if it exists and recreates it with migrations.
pub async fn reset(config: &Config) -> anyhow::Result<()> {
    if Sqlite::database_exists(&config.database.url).await? {
        Sqlite::drop_database(&config.database.url).await?;
        tracing::info!(url = %config.database.url, "Dropped database");
    }

    migrate(config).await
}
