//! Database layer for Givebox

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

pub mod appeals;
pub mod categories;
pub mod items;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod points;
pub mod profiles;
pub mod settings;
pub mod store;

#[cfg(any(test, feature = "memory"))]
pub use memory::{FailPoint, MemoryStore};
pub use store::{
    AppealStore, CategoryStore, ItemStore, PgStore, PointStore, ProfileStore, SettingsStore,
    Store,
};

/// Create a database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    info!("Database connected");
    Ok(pool)
}

/// Run database migrations from SQL files
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Running migrations...");

    let migration_sql = include_str!("../../../migrations/001_initial.sql");
    sqlx::raw_sql(migration_sql).execute(pool).await?;

    info!("Migrations complete");
    Ok(())
}
