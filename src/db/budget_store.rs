use sqlx::{sqlite::SqliteRow, types::Json, Row};

use crate::{
    db::{tables::BudgetTable, DbPool},
    error::{AppError, Result},
    models::{
        budget::{AdditionalService, Budget, PackageMeasurement},
        price_table::DeliveryType,
    },
};

/// Budget store for database operations
#[derive(Clone)]
pub struct BudgetStore {
    pool: DbPool,
}

impl BudgetStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<Budget>> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {} ORDER BY created_at DESC",
            BudgetTable::TABLE_NAME
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        rows.iter().map(budget_from_row).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Budget> {
        let row = sqlx::query(&format!(
            "SELECT * FROM {} WHERE id = ?",
            BudgetTable::TABLE_NAME
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Budget {}", id)))?;

        budget_from_row(&row)
    }

    /// Insert a priced budget. Totals must come from the pricing engine.
    pub async fn insert(&self, budget: &Budget) -> Result<Budget> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, client_id, price_table_id, delivery_type, merchandise_value,
                has_collection, has_delivery, packages, additional_services, total_volumes,
                total_value, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            BudgetTable::TABLE_NAME
        ))
        .bind(&budget.id)
        .bind(&budget.client_id)
        .bind(&budget.price_table_id)
        .bind(budget.delivery_type.keyword())
        .bind(budget.merchandise_value)
        .bind(budget.has_collection)
        .bind(budget.has_delivery)
        .bind(Json(&budget.packages))
        .bind(Json(&budget.additional_services))
        .bind(i64::from(budget.total_volumes))
        .bind(budget.total_value)
        .bind(&budget.notes)
        .bind(budget.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        tracing::info!(
            "Saved budget {} for client {}: {}",
            budget.id,
            budget.client_id,
            budget.total_value
        );
        self.get_by_id(&budget.id).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = ?",
            BudgetTable::TABLE_NAME
        ))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Budget {}", id)));
        }
        Ok(())
    }
}

fn budget_from_row(row: &SqliteRow) -> Result<Budget> {
    let delivery_type: String = row.try_get("delivery_type")?;
    let delivery_type: DeliveryType =
        serde_json::from_value(serde_json::Value::String(delivery_type))?;
    let packages: Json<Vec<PackageMeasurement>> = row.try_get("packages")?;
    let services: Json<Vec<AdditionalService>> = row.try_get("additional_services")?;
    let total_volumes: i64 = row.try_get("total_volumes")?;

    Ok(Budget {
        id: row.try_get("id")?,
        client_id: row.try_get("client_id")?,
        price_table_id: row.try_get("price_table_id")?,
        delivery_type,
        merchandise_value: row.try_get("merchandise_value")?,
        has_collection: row.try_get("has_collection")?,
        has_delivery: row.try_get("has_delivery")?,
        packages: packages.0,
        additional_services: services.0,
        total_volumes: u32::try_from(total_volumes)
            .map_err(|e| AppError::Internal(format!("invalid total_volumes: {}", e)))?,
        total_value: row.try_get("total_value")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}
