use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, types::Json, Row};

use crate::{
    db::{tables::PriceTableTable, DbPool},
    error::{AppError, Result},
    models::price_table::{
        CustomService, InsuranceRates, PriceTable, ServiceRates, WaitingHourRates,
    },
};

/// Price table store for database operations
#[derive(Clone)]
pub struct PriceTableStore {
    pool: DbPool,
}

impl PriceTableStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<PriceTable>> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {} ORDER BY name",
            PriceTableTable::TABLE_NAME
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        rows.iter().map(price_table_from_row).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<PriceTable> {
        let row = sqlx::query(&format!(
            "SELECT * FROM {} WHERE id = ?",
            PriceTableTable::TABLE_NAME
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Price table {}", id)))?;

        price_table_from_row(&row)
    }

    /// Create or replace a price table
    pub async fn save(&self, table: &PriceTable) -> Result<PriceTable> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, name, multiplier, rates, door_to_door_rate_per_km,
                waiting_hour_rates, insurance_rates, custom_services, last_edit)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                multiplier = excluded.multiplier,
                rates = excluded.rates,
                door_to_door_rate_per_km = excluded.door_to_door_rate_per_km,
                waiting_hour_rates = excluded.waiting_hour_rates,
                insurance_rates = excluded.insurance_rates,
                custom_services = excluded.custom_services,
                last_edit = excluded.last_edit
            "#,
            PriceTableTable::TABLE_NAME
        ))
        .bind(&table.id)
        .bind(&table.name)
        .bind(table.multiplier)
        .bind(Json(&table.rates))
        .bind(table.door_to_door_rate_per_km)
        .bind(Json(&table.waiting_hour_rates))
        .bind(Json(&table.insurance_rates))
        .bind(Json(&table.custom_services))
        .bind(table.last_edit)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        tracing::info!("Saved price table {} ({})", table.name, table.id);
        self.get_by_id(&table.id).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = ?",
            PriceTableTable::TABLE_NAME
        ))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Price table {}", id)));
        }
        Ok(())
    }
}

fn price_table_from_row(row: &SqliteRow) -> Result<PriceTable> {
    let rates: Json<ServiceRates> = row.try_get("rates")?;
    let waiting_hour_rates: Json<WaitingHourRates> = row.try_get("waiting_hour_rates")?;
    let insurance_rates: Json<InsuranceRates> = row.try_get("insurance_rates")?;
    let custom_services: Json<Vec<CustomService>> = row.try_get("custom_services")?;
    let last_edit: DateTime<Utc> = row.try_get("last_edit")?;

    Ok(PriceTable {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        multiplier: row.try_get("multiplier")?,
        rates: rates.0,
        door_to_door_rate_per_km: row.try_get("door_to_door_rate_per_km")?,
        waiting_hour_rates: waiting_hour_rates.0,
        insurance_rates: insurance_rates.0,
        custom_services: custom_services.0,
        last_edit,
    })
}
