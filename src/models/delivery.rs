use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Delivery record spawned when a shipment or one of its documents is
/// delivered. References the shipment by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: String,
    pub client_id: String,
    pub shipment_id: String,
    pub document_id: Option<String>,
    pub delivery_date: NaiveDate,
    pub delivery_time: NaiveTime,
    pub receiver_name: String,
    pub weight: f64,
    pub packages: i64,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
