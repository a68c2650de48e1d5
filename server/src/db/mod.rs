//! Postgres pool construction and embedded migrations.
//!
//! SYSTEM CONTEXT
//! ==============
//! The whole evaluation store (users, projects, prompts, datasets, jobs,
//! entries) lives in one schema, created by the migrations under
//! `src/db/migrations`. `main` builds the pool here and runs those
//! migrations to completion before the router binds, so handlers never see
//! a partially migrated database.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

fn db_max_connections() -> u32 {
    std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
}

/// Build the connection pool and bring the schema up to date.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(db_max_connections())
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
