use async_trait::async_trait;

use crate::{
    db::{tables::DeliveryTable, DbPool},
    error::{AppError, Result},
    lifecycle::DeliveryRepository,
    models::delivery::Delivery,
};

/// Delivery store for database operations
#[derive(Clone)]
pub struct DeliveryStore {
    pool: DbPool,
}

impl DeliveryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<Delivery>> {
        let deliveries = sqlx::query_as::<_, Delivery>(&format!(
            "SELECT * FROM {} ORDER BY created_at DESC",
            DeliveryTable::TABLE_NAME
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(deliveries)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Delivery> {
        let delivery = sqlx::query_as::<_, Delivery>(&format!(
            "SELECT * FROM {} WHERE id = ?",
            DeliveryTable::TABLE_NAME
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Delivery {}", id)))?;

        Ok(delivery)
    }

    pub async fn get_by_shipment(&self, shipment_id: &str) -> Result<Vec<Delivery>> {
        let deliveries = sqlx::query_as::<_, Delivery>(&format!(
            "SELECT * FROM {} WHERE shipment_id = ? ORDER BY created_at",
            DeliveryTable::TABLE_NAME
        ))
        .bind(shipment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(deliveries)
    }
}

#[async_trait]
impl DeliveryRepository for DeliveryStore {
    async fn create_delivery(&self, delivery: &Delivery) -> Result<()> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, client_id, shipment_id, document_id, delivery_date,
                delivery_time, receiver_name, weight, packages, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            DeliveryTable::TABLE_NAME
        ))
        .bind(&delivery.id)
        .bind(&delivery.client_id)
        .bind(&delivery.shipment_id)
        .bind(&delivery.document_id)
        .bind(delivery.delivery_date)
        .bind(delivery.delivery_time)
        .bind(&delivery.receiver_name)
        .bind(delivery.weight)
        .bind(delivery.packages)
        .bind(&delivery.notes)
        .bind(delivery.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        tracing::info!(
            "Created delivery {} for shipment {}",
            delivery.id,
            delivery.shipment_id
        );
        Ok(())
    }
}
