use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use crate::store::Collection;

pub type DbPool = PgPool;

/// Connect to `db_name` on the server addressed by `database_url`.
pub async fn create_pool(database_url: &str, db_name: &str) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?.database(db_name);
    PgPoolOptions::new().connect_with(options).await
}

/// Create the collection tables if they don't exist yet. Safe to run on every boot.
pub async fn ensure_collections(pool: &DbPool) -> Result<(), sqlx::Error> {
    for collection in Collection::all() {
        let table = collection.as_str();

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                seq  BIGSERIAL,
                id   TEXT PRIMARY KEY,
                doc  JSONB NOT NULL
            )
            "#
        ))
        .execute(pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_seq ON {table} (seq)"
        ))
        .execute(pool)
        .await?;
    }

    // Lead listing filters on status and sorts on created_at.
    let leads = Collection::ContactLeads.as_str();
    for field in ["status", "created_at"] {
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{leads}_{field} ON {leads} ((doc ->> '{field}'))"
        ))
        .execute(pool)
        .await?;
    }

    info!("Collections ready");
    Ok(())
}
