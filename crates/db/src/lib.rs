//! PostgreSQL side of the auto-remove extension.
//!
//! Renders the scopes from `autoremove_core` into SQL through
//! [`sqlx::QueryBuilder`], implements [`autoremove_core::store::SoftDeleteStore`]
//! for a [`PgPool`](sqlx::PgPool), and adds bulk statements for removing and
//! restoring whole sets of related rows under one code.

use sqlx::postgres::PgPoolOptions;

pub mod config;
pub mod error;
pub mod query;
pub mod relation;
pub mod store;

pub use config::DbConfig;
pub use error::{DbError, DbResult};
pub use query::ScopedQuery;
pub use store::PgSoftDeleteStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a loaded [`DbConfig`].
pub async fn create_pool_with(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    tracing::info!(max_connections = config.max_connections, "Database connection pool created");
    Ok(pool)
}

/// Round-trip a trivial query to confirm the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
