use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Shipment status as persisted and reported on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ShipmentStatus {
    InTransit,
    AtCarrier,
    Retained,
    /// Picked up by the client; not the final delivery
    Delivered,
    PartiallyDelivered,
    DeliveredFinal,
}

impl Default for ShipmentStatus {
    fn default() -> Self {
        Self::InTransit
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::AtCarrier => "at_carrier",
            ShipmentStatus::Retained => "retained",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::PartiallyDelivered => "partially_delivered",
            ShipmentStatus::DeliveredFinal => "delivered_final",
        };
        f.write_str(name)
    }
}

/// Customs/tax hold on a retained shipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalAction {
    pub reason: String,
    pub amount_to_pay: f64,
    pub action_number: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub release_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Document carried by a shipment (minute plus its invoices)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub minute_number: String,
    pub invoice_numbers: Vec<String>,
    pub packages: Option<i64>,
    pub weight: Option<f64>,
    pub is_delivered: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    pub client_id: String,
    pub transport_mode: String,
    pub carrier: String,
    pub tracking_number: String,
    pub packages: i64,
    pub weight: f64,
    pub arrival_flight: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub status: ShipmentStatus,
    pub is_retained: bool,
    pub fiscal_action: Option<FiscalAction>,
    pub receiver_name: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<NaiveTime>,
    pub documents: Vec<Document>,
    pub last_edit: DateTime<Utc>,
}

impl Shipment {
    pub fn delivered_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_delivered).count()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    pub minute_number: String,
    #[serde(default)]
    pub invoice_numbers: Vec<String>,
    #[serde(default)]
    pub packages: Option<i64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// New shipment payload. Status always starts at `in_transit`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentInput {
    pub client_id: String,
    pub transport_mode: String,
    pub carrier: String,
    pub tracking_number: String,
    #[serde(default)]
    pub packages: i64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub arrival_flight: Option<String>,
    #[serde(default)]
    pub arrival_date: Option<NaiveDate>,
    #[serde(default)]
    pub documents: Vec<DocumentInput>,
}

impl ShipmentInput {
    pub fn into_shipment(self, last_edit: DateTime<Utc>) -> Shipment {
        let documents = self
            .documents
            .into_iter()
            .map(|doc| Document {
                id: uuid::Uuid::new_v4().to_string(),
                minute_number: doc.minute_number,
                invoice_numbers: doc.invoice_numbers,
                packages: doc.packages,
                weight: doc.weight,
                is_delivered: false,
                notes: doc.notes,
            })
            .collect();

        Shipment {
            id: uuid::Uuid::new_v4().to_string(),
            client_id: self.client_id,
            transport_mode: self.transport_mode,
            carrier: self.carrier,
            tracking_number: self.tracking_number,
            packages: self.packages,
            weight: self.weight,
            arrival_flight: self.arrival_flight,
            arrival_date: self.arrival_date,
            status: ShipmentStatus::InTransit,
            is_retained: false,
            fiscal_action: None,
            receiver_name: None,
            delivery_date: None,
            delivery_time: None,
            documents,
            last_edit,
        }
    }
}
