use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use sqlx::{PgPool, postgres::PgPoolOptions};

pub mod models;
pub mod repositories;
pub mod transaction;
pub mod utils;

static POOL: OnceLock<PgPool> = OnceLock::new();

/// Connect, run migrations and install the pool used by every repository.
pub async fn init_database(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed successfully");

    POOL.set(pool.clone())
        .map_err(|_| anyhow!("Database pool already initialized"))?;

    Ok(pool)
}

/// Shared connection pool.
///
/// Panics if called before [`init_database`], which `main` runs before the
/// server accepts requests.
pub fn get_pool() -> &'static PgPool {
    POOL.get().expect("database pool is not initialized")
}
