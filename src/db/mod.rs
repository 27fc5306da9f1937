use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::time::Duration;

pub mod budget_store;
pub mod delivery_store;
pub mod price_table_store;
pub mod shipment_store;
pub mod tables;

pub use budget_store::BudgetStore;
pub use delivery_store::DeliveryStore;
pub use price_table_store::PriceTableStore;
pub use shipment_store::ShipmentStore;

use tables::{BudgetTable, DeliveryTable, DocumentTable, PriceTableTable, ShipmentTable};

pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    // Create the database if it doesn't exist
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        Sqlite::create_database(database_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    setup_database(&pool).await?;

    Ok(pool)
}

/// Set up the database schema
pub async fn setup_database(pool: &DbPool) -> Result<()> {
    for statement in [
        PriceTableTable::create_table(),
        BudgetTable::create_table(),
        ShipmentTable::create_table(),
        DocumentTable::create_table(),
        DeliveryTable::create_table(),
    ] {
        sqlx::query(&statement).execute(pool).await?;
    }

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_documents_shipment ON {} (shipment_id)",
        DocumentTable::TABLE_NAME
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_deliveries_shipment ON {} (shipment_id)",
        DeliveryTable::TABLE_NAME
    ))
    .execute(pool)
    .await?;

    tracing::debug!("Database schema ready");
    Ok(())
}

/// Single-connection in-memory pool with the schema applied
#[cfg(test)]
pub async fn test_pool() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    setup_database(&pool)
        .await
        .expect("Failed to create schema");
    pool
}
