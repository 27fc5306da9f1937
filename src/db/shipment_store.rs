use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, types::Json, Row};

use crate::{
    db::{
        tables::{DocumentTable, ShipmentTable},
        DbPool,
    },
    error::{AppError, Result},
    lifecycle::ShipmentRepository,
    models::shipment::{Document, FiscalAction, Shipment},
};

/// Shipment store for database operations. Documents live in their own
/// table and are loaded with their shipment.
#[derive(Clone)]
pub struct ShipmentStore {
    pool: DbPool,
}

impl ShipmentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<Shipment>> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {} ORDER BY last_edit DESC",
            ShipmentTable::TABLE_NAME
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let mut shipments = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.try_get("id")?;
            let documents = self.get_documents(&id).await?;
            shipments.push(shipment_from_row(row, documents)?);
        }
        Ok(shipments)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Shipment> {
        let row = sqlx::query(&format!(
            "SELECT * FROM {} WHERE id = ?",
            ShipmentTable::TABLE_NAME
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Shipment {}", id)))?;

        let documents = self.get_documents(id).await?;
        shipment_from_row(&row, documents)
    }

    async fn get_documents(&self, shipment_id: &str) -> Result<Vec<Document>> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {} WHERE shipment_id = ? ORDER BY position",
            DocumentTable::TABLE_NAME
        ))
        .bind(shipment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        rows.iter().map(document_from_row).collect()
    }

    /// Insert a new shipment together with its documents
    pub async fn insert(&self, shipment: &Shipment) -> Result<Shipment> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, client_id, transport_mode, carrier, tracking_number, packages,
                weight, arrival_flight, arrival_date, status, is_retained, fiscal_action,
                receiver_name, delivery_date, delivery_time, last_edit)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            ShipmentTable::TABLE_NAME
        ))
        .bind(&shipment.id)
        .bind(&shipment.client_id)
        .bind(&shipment.transport_mode)
        .bind(&shipment.carrier)
        .bind(&shipment.tracking_number)
        .bind(shipment.packages)
        .bind(shipment.weight)
        .bind(&shipment.arrival_flight)
        .bind(shipment.arrival_date)
        .bind(shipment.status)
        .bind(shipment.is_retained)
        .bind(shipment.fiscal_action.as_ref().map(Json))
        .bind(&shipment.receiver_name)
        .bind(shipment.delivery_date)
        .bind(shipment.delivery_time)
        .bind(shipment.last_edit)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        for (position, document) in shipment.documents.iter().enumerate() {
            sqlx::query(&format!(
                r#"
                INSERT INTO {} (id, shipment_id, position, minute_number, invoice_numbers,
                    packages, weight, is_delivered, notes, last_edit)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                DocumentTable::TABLE_NAME
            ))
            .bind(&document.id)
            .bind(&shipment.id)
            .bind(position as i64)
            .bind(&document.minute_number)
            .bind(Json(&document.invoice_numbers))
            .bind(document.packages)
            .bind(document.weight)
            .bind(document.is_delivered)
            .bind(&document.notes)
            .bind(shipment.last_edit)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Created shipment {} with {} document(s)",
            shipment.tracking_number,
            shipment.documents.len()
        );
        self.get_by_id(&shipment.id).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(&format!(
            "DELETE FROM {} WHERE shipment_id = ?",
            DocumentTable::TABLE_NAME
        ))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = ?",
            ShipmentTable::TABLE_NAME
        ))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Shipment {}", id)));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}

#[async_trait]
impl ShipmentRepository for ShipmentStore {
    async fn get_shipment(&self, id: &str) -> Result<Shipment> {
        self.get_by_id(id).await
    }

    async fn mark_document_delivered(
        &self,
        shipment_id: &str,
        document_id: &str,
        last_edit: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET is_delivered = 1, last_edit = ? WHERE id = ? AND shipment_id = ?",
            DocumentTable::TABLE_NAME
        ))
        .bind(last_edit)
        .bind(document_id)
        .bind(shipment_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Document {}", document_id)));
        }
        Ok(())
    }

    async fn update_status(&self, shipment: &Shipment) -> Result<()> {
        let result = sqlx::query(&format!(
            r#"
            UPDATE {}
            SET status = ?, is_retained = ?, fiscal_action = ?, receiver_name = ?,
                delivery_date = ?, delivery_time = ?, last_edit = ?
            WHERE id = ?
            "#,
            ShipmentTable::TABLE_NAME
        ))
        .bind(shipment.status)
        .bind(shipment.is_retained)
        .bind(shipment.fiscal_action.as_ref().map(Json))
        .bind(&shipment.receiver_name)
        .bind(shipment.delivery_date)
        .bind(shipment.delivery_time)
        .bind(shipment.last_edit)
        .bind(&shipment.id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Shipment {}", shipment.id)));
        }
        Ok(())
    }
}

fn shipment_from_row(row: &SqliteRow, documents: Vec<Document>) -> Result<Shipment> {
    let fiscal_action: Option<Json<FiscalAction>> = row.try_get("fiscal_action")?;

    Ok(Shipment {
        id: row.try_get("id")?,
        client_id: row.try_get("client_id")?,
        transport_mode: row.try_get("transport_mode")?,
        carrier: row.try_get("carrier")?,
        tracking_number: row.try_get("tracking_number")?,
        packages: row.try_get("packages")?,
        weight: row.try_get("weight")?,
        arrival_flight: row.try_get("arrival_flight")?,
        arrival_date: row.try_get("arrival_date")?,
        status: row.try_get("status")?,
        is_retained: row.try_get("is_retained")?,
        fiscal_action: fiscal_action.map(|json| json.0),
        receiver_name: row.try_get("receiver_name")?,
        delivery_date: row.try_get("delivery_date")?,
        delivery_time: row.try_get("delivery_time")?,
        documents,
        last_edit: row.try_get("last_edit")?,
    })
}

fn document_from_row(row: &SqliteRow) -> Result<Document> {
    let invoice_numbers: Json<Vec<String>> = row.try_get("invoice_numbers")?;

    Ok(Document {
        id: row.try_get("id")?,
        minute_number: row.try_get("minute_number")?,
        invoice_numbers: invoice_numbers.0,
        packages: row.try_get("packages")?,
        weight: row.try_get("weight")?,
        is_delivered: row.try_get("is_delivered")?,
        notes: row.try_get("notes")?,
    })
}
